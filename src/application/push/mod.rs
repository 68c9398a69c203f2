//! Workers Push Module
//!
//! ## Structure
//!
//! - `options` - `PushOptions`
//! - `result` - `PushOutcome`
//! - `use_case` - `PushUseCase`, one build-and-upload cycle
//!
//! ## Usage
//!
//! ```ignore
//! use edgepush::application::push::{PushOptions, PushUseCase};
//!
//! let use_case = PushUseCase::new(api, bundler, reader);
//! let mut state = PushState::now();
//! use_case.push(&options, &mut state, &events)?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::{is_module_specifier, PushOptions};
pub use result::PushOutcome;
pub use use_case::PushUseCase;

#[cfg(test)]
mod tests;
