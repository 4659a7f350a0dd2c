//! Intake service: `POST /` with `{"cep": "..."}` validates the CEP locally
//! and relays the resolution service's answer unchanged.

pub mod error;
pub mod forward;
pub mod router;

pub use cepweather_core::http::MessageBody;
pub use error::InputError;
pub use forward::{ForwardError, Forwarded, ResolutionClient};
pub use router::{router, CepRequest, InputState};
