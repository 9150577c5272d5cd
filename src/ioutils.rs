use std::io::Read;
use std::path::Path;

use crate::constants::STDIN_INDICATOR;
use crate::error::{Error, Result};

pub fn read_from(mut reader: impl Read) -> Result<String> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf).map_err(Error::IoError)?;
    Ok(buf)
}

/// Returns `value` itself, or stdin's content when `value` is `-`.
pub fn read_arg_or_stdin(value: &str) -> Result<String> {
    if value == STDIN_INDICATOR {
        read_from(std::io::stdin().lock())
    } else {
        Ok(value.to_string())
    }
}

/// Reads the file at `path`, or stdin when `path` is `-`.
pub fn read_file_or_stdin<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if path.as_os_str() == STDIN_INDICATOR {
        read_from(std::io::stdin().lock())
    } else {
        std::fs::read_to_string(path).map_err(Error::IoError)
    }
}
