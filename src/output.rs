use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;

use crate::cli::OutputFormat;

/// Writes the random bytes to stdout or a file in the specified format.
pub fn write_output(
    bytes: &[u8],
    format: &OutputFormat,
    output_file: Option<&Path>,
) -> io::Result<()> {
    match output_file {
        Some(path) => {
            let f = File::create(path)?;
            let mut out = BufWriter::new(f);
            format_output(bytes, format, &mut out)?;
            out.flush()
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            format_output(bytes, format, &mut out)?;
            out.flush()
        }
    }
}

fn format_output(bytes: &[u8], format: &OutputFormat, out: &mut dyn Write) -> io::Result<()> {
    match format {
        OutputFormat::Hex => {
            for b in bytes {
                write!(out, "{:02x}", b)?;
            }
            writeln!(out)?;
        }
        OutputFormat::HexUpper => {
            for b in bytes {
                write!(out, "{:02X}", b)?;
            }
            writeln!(out)?;
        }
        OutputFormat::Raw => {
            out.write_all(bytes)?;
        }
        OutputFormat::Base64 => {
            writeln!(out, "{}", STANDARD.encode(bytes))?;
        }
        OutputFormat::Base64url => {
            writeln!(out, "{}", URL_SAFE_NO_PAD.encode(bytes))?;
        }
        OutputFormat::Octal => {
            write_joined(bytes, out, |b| format!("{:03o}", b))?;
        }
        OutputFormat::Binary => {
            write_joined(bytes, out, |b| format!("{:08b}", b))?;
        }
    }
    Ok(())
}

fn write_joined(bytes: &[u8], out: &mut dyn Write, fmt: impl Fn(u8) -> String) -> io::Result<()> {
    let parts: Vec<String> = bytes.iter().map(|&b| fmt(b)).collect();
    writeln!(out, "{}", parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format_to_string(bytes: &[u8], fmt: &OutputFormat) -> String {
        let mut buf = Vec::new();
        format_output(bytes, fmt, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_hex() {
        let out = format_to_string(&[0xde, 0xad, 0xbe, 0xef], &OutputFormat::Hex);
        assert_eq!(out, "deadbeef\n");
    }

    #[test]
    fn test_hex_upper() {
        let out = format_to_string(&[0xde, 0xad, 0xbe, 0xef], &OutputFormat::HexUpper);
        assert_eq!(out, "DEADBEEF\n");
    }

    #[test]
    fn test_raw() {
        let data = vec![0x01, 0x02, 0x03];
        let mut buf = Vec::new();
        format_output(&data, &OutputFormat::Raw, &mut buf).unwrap();
        assert_eq!(buf, data);
    }

    #[test]
    fn test_base64() {
        let out = format_to_string(&[0x00, 0x01, 0x02], &OutputFormat::Base64);
        assert_eq!(out, "AAEC\n");
    }

    #[test]
    fn test_base64url() {
        let out = format_to_string(&[0xfb, 0xff, 0xfe], &OutputFormat::Base64url);
        assert_eq!(out, "-__-\n");
    }

    #[test]
    fn test_octal() {
        let out = format_to_string(&[0o377, 0o001], &OutputFormat::Octal);
        assert_eq!(out, "377 001\n");
    }

    #[test]
    fn test_binary() {
        let out = format_to_string(&[0b10101010, 0b00001111], &OutputFormat::Binary);
        assert_eq!(out, "10101010 00001111\n");
    }

    #[test]
    fn test_write_to_file() {
        let path = std::env::temp_dir().join("drng_test_output.bin");
        write_output(&[1, 2, 3], &OutputFormat::Raw, Some(&path)).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
        let _ = std::fs::remove_file(&path);
    }
}
