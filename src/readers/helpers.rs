// src/readers/helpers.rs

//! Miscellaneous helper functions for _Readers_.

use crate::common::{FPath, PATH_STDIN};

use std::fs::File;
use std::io::{BufRead, BufReader};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Helper function for completeness.
pub fn fpath_to_path(path: &FPath) -> &std::path::Path {
    std::path::Path::new(path)
}

/// Is this `path` the stand-in for standard input?
pub fn path_is_stdin(path: &FPath) -> bool {
    path.as_str() == PATH_STDIN
}

/// Open `path` for line-by-line reading. [`PATH_STDIN`] is standard input.
pub fn open_bufread(path: &FPath) -> std::io::Result<Box<dyn BufRead>> {
    defn!("({:?})", path);
    if path_is_stdin(path) {
        defx!("stdin");
        return Ok(Box::new(BufReader::new(std::io::stdin())));
    }
    let file = match File::open(fpath_to_path(path)) {
        Ok(val) => val,
        Err(err) => {
            defx!("File::open error {}", err);
            return Err(err);
        }
    };
    defx!("opened {:?}", path);

    Ok(Box::new(BufReader::new(file)))
}

/// Read the next line of `reader` into `buffer`, including the line ending.
///
/// Bytes that are not valid UTF-8 become `U+FFFD`. Returns `Ok(None)` at
/// the end of input.
pub fn read_line_lossy(
    reader: &mut dyn BufRead,
    buffer: &mut Vec<u8>,
) -> std::io::Result<Option<String>> {
    buffer.clear();
    let read: usize = reader.read_until(b'\n', buffer)?;
    if read == 0 {
        return Ok(None);
    }
    let line: String = String::from_utf8_lossy(buffer).into_owned();
    defñ!("read {} bytes {:?}", read, line);

    Ok(Some(line))
}
