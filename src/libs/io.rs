use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};

use anyhow::Context;

/// Opens `input` for buffered reading. `stdin` selects standard input.
///
/// Gzip files are detected by their magic bytes rather than the file
/// extension, so `query.fa.gz` and a renamed `query.fa` both work.
pub fn reader(input: &str) -> anyhow::Result<Box<dyn BufRead>> {
    if input == "stdin" {
        return Ok(Box::new(BufReader::new(std::io::stdin())));
    }

    let path = std::path::Path::new(input);
    let is_gz = {
        let mut file =
            File::open(path).with_context(|| format!("could not open {}", path.display()))?;
        let mut magic = [0u8; 2];
        // An input shorter than two bytes cannot be gzip
        match file.read_exact(&mut magic) {
            Ok(()) => magic == [0x1f, 0x8b],
            Err(_) => false,
        }
    };

    let file = File::open(path).with_context(|| format!("could not open {}", path.display()))?;
    let reader: Box<dyn BufRead> = if is_gz {
        Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    Ok(reader)
}

/// Opens `output` for buffered writing. `stdout` selects standard output.
pub fn writer(output: &str) -> anyhow::Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = if output == "stdout" {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        let file = File::create(output).with_context(|| format!("could not create {}", output))?;
        Box::new(BufWriter::new(file))
    };

    Ok(writer)
}
