//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.
//!
//! Repository ports use RPITIT futures and are held generically; the hook,
//! token-source, and time-source ports are object-safe (`async_trait`)
//! because the registry stores them as trait objects.

pub mod automation_repo;
pub mod clock;
pub mod credential_repo;
pub mod hooks;
pub mod token;

pub use automation_repo::AutomationRepository;
pub use clock::TimeSource;
pub use credential_repo::CredentialRepository;
pub use hooks::{ConditionEvaluator, EffectExecutor};
pub use token::{AccessTokens, TokenEndpoint, TokenGrant};
