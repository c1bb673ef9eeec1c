pub mod cli;
pub mod errors;
pub mod simple;
pub mod summary;
#[cfg(test)]
mod tests;

use errors::OrchestrationError;
use starmart_types::errors::connector::ConnectorError;
use starmart_types::tracing::error;
use std::{backtrace::Backtrace, panic};

pub fn set_panic_hook() {
    panic::set_hook(Box::new(move |panic_info| {
        if let Some(e) = panic_info.payload().downcast_ref::<OrchestrationError>() {
            error!("{}", e);
        } else if let Some(e) = panic_info.payload().downcast_ref::<ConnectorError>() {
            error!("{}", e);
        } else if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            error!("{s:?}");
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            error!("{s:?}");
        } else {
            error!("{}", panic_info);
        }

        let backtrace = Backtrace::capture();
        error!("{backtrace}");

        std::process::exit(1);
    }));
}
