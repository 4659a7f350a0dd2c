//! Resolution service: `GET /weather/{cep}` answers with the current
//! temperature for a CEP in Celsius, Fahrenheit and Kelvin.

pub mod error;
pub mod router;

pub use cepweather_core::http::MessageBody;
pub use error::ApiError;
pub use router::{router, AppState};
