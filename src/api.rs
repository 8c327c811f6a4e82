//! Wire-format implementations shared by providers.

pub mod openai;
