pub mod artifact;
pub mod error;
pub mod fingerprint;
pub mod nuclei;
mod process;

pub use artifact::artifact_name;
pub use error::RunnerError;
pub use fingerprint::FingerprintRunner;
pub use nuclei::{CheckRunner, NucleiRunner, RunStatus};
