pub mod echo;
pub mod openrouter;

pub use echo::EchoClient;
pub use openrouter::OpenRouterClient;
