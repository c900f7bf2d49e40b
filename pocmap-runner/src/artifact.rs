use std::time::{SystemTime, UNIX_EPOCH};

use pocmap_types::ScanTask;

const ARTIFACT_PREFIX: &str = "result_";
const ARTIFACT_EXTENSION: &str = "json";

/// File name for the findings of `task`, e.g.
/// `result_1718000000123_000042_CVE-2021-1111.yaml.json`.
///
/// The sequence number keeps names unique when tasks for the same check
/// start within the same millisecond.
pub fn artifact_name(task: &ScanTask, unix_millis: u128) -> String {
    let base: String = task
        .check
        .basename()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect();
    format!(
        "{ARTIFACT_PREFIX}{unix_millis}_{:06}_{base}.{ARTIFACT_EXTENSION}",
        task.seq
    )
}

pub(crate) fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pocmap_types::CheckRef;

    #[test]
    fn name_contains_timestamp_seq_and_basename() {
        let task = ScanTask::new("http://a:80", CheckRef::new("poc/cve/CVE-2021-1111.yaml"), 42);
        assert_eq!(
            artifact_name(&task, 1_718_000_000_123),
            "result_1718000000123_000042_CVE-2021-1111.yaml.json"
        );
    }

    #[test]
    fn same_check_same_instant_distinct_names() {
        let check = CheckRef::new("poc/nginx/x.yaml");
        let a = ScanTask::new("http://a:80", check.clone(), 1);
        let b = ScanTask::new("http://b:80", check, 2);
        assert_ne!(artifact_name(&a, 5), artifact_name(&b, 5));
    }

    #[test]
    fn odd_characters_replaced() {
        let task = ScanTask::new("u", CheckRef::new("poc/a b&c.yaml"), 0);
        assert_eq!(artifact_name(&task, 1), "result_1_000000_a_b_c.yaml.json");
    }
}
