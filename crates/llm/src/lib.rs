pub mod formatter;
pub mod provider;
pub mod providers;
pub mod rate_limit;

pub use formatter::{window_context, FormattedChunk, WindowFormatter, SYSTEM_PROMPT};
pub use provider::{LlmError, LlmProvider, Message, Role};
pub use providers::create_provider;
pub use rate_limit::{FixedDelay, RateLimiter, Unlimited};
