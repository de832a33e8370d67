use anyhow::Context;
use clap::*;
use itertools::Itertools;
use std::io::Write;
use std::time::Instant;

use seal::libs::engine::Engine;

// Width of alignment lines in the report
const WRAP: usize = 60;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("search")
        .about("Heuristic search of DNA queries against a sequence database")
        .after_help(
            r###"
This command searches every query sequence against every database sequence and reports,
per query, the ten best-scoring matches with their aligned region.

Matching is seed-and-extend: 11-mers of the query are indexed, runs of consecutively
matching windows in a database sequence are collected into chains, and the two longest
chains decide whether the pair is scored directly from the dominant anchor or through a
dynamic-programming alignment of the chain-bounded windows. Pairs without a qualifying
chain produce no report entry.

Notes:
* Inputs are DNA FASTA files, plain or gzipped; sequences are uppercased on read
* Query sequences shorter than 11 symbols can never match
* Database sequences are streamed and processed one at a time

Examples:
1. Search queries against a database:
   seal search query.fa database.fa

2. Gzipped inputs, report to a file, four threads:
   seal search query.fa.gz database.fa.gz -o report.txt -p 4

"###,
        )
        .arg(
            Arg::new("query")
                .required(true)
                .num_args(1)
                .index(1)
                .help("Query FASTA file to search with"),
        )
        .arg(
            Arg::new("database")
                .required(true)
                .num_args(1)
                .index(2)
                .help("Database FASTA file to search against"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .short('p')
                .num_args(1)
                .default_value("1")
                .value_parser(value_parser!(usize))
                .help("Number of threads for parallel processing"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let infile_query = args.get_one::<String>("query").unwrap();
    let infile_db = args.get_one::<String>("database").unwrap();
    let mut writer = seal::writer(args.get_one::<String>("outfile").unwrap())?;

    // Set the number of threads for rayon
    let opt_parallel = *args.get_one::<usize>("parallel").unwrap();
    rayon::ThreadPoolBuilder::new()
        .num_threads(opt_parallel)
        .build_global()?;

    let start = Instant::now();

    //----------------------------
    // Queries
    //----------------------------
    let (labels, seqs) = read_queries(infile_query)?;
    let mut engine = Engine::new(labels, seqs);

    //----------------------------
    // Database pass
    //----------------------------
    {
        let reader = seal::reader(infile_db)?;
        let mut fa_in = noodles_fasta::io::Reader::new(reader);

        for result in fa_in.records() {
            let record =
                result.with_context(|| format!("malformed FASTA record in {}", infile_db))?;
            let name = String::from_utf8(record.name().into())?;
            let seq: Vec<u8> = record
                .sequence()
                .get(..)
                .unwrap()
                .iter()
                .map(|b| b.to_ascii_uppercase())
                .collect();

            engine.process(&name, &seq);
        }
    }

    //----------------------------
    // Output
    //----------------------------
    let elapsed = start.elapsed().as_secs_f64();
    write_report(&mut writer, &engine, elapsed)?;

    Ok(())
}

// Reads all query records into parallel label/sequence vectors
fn read_queries(infile: &str) -> anyhow::Result<(Vec<String>, Vec<Vec<u8>>)> {
    let reader = seal::reader(infile)?;
    let mut fa_in = noodles_fasta::io::Reader::new(reader);

    let mut labels = Vec::new();
    let mut seqs = Vec::new();
    for result in fa_in.records() {
        let record = result.with_context(|| format!("malformed FASTA record in {}", infile))?;
        labels.push(String::from_utf8(record.name().into())?);
        seqs.push(
            record
                .sequence()
                .get(..)
                .unwrap()
                .iter()
                .map(|b| b.to_ascii_uppercase())
                .collect(),
        );
    }

    Ok((labels, seqs))
}

fn write_report(
    writer: &mut Box<dyn Write>,
    engine: &Engine,
    elapsed: f64,
) -> anyhow::Result<()> {
    writer.write_fmt(format_args!("Time since submission: {:.2}s\n\n", elapsed))?;

    for (query, bucket) in engine.queries().iter().zip(engine.hits().iter()) {
        writer.write_fmt(format_args!("Query: {}\n", query.label))?;
        writer.write_fmt(format_args!("Query length: {}\n\n", query.seq.len()))?;

        if bucket.is_empty() {
            writer.write_fmt(format_args!("No significant alignments found.\n\n"))?;
            continue;
        }

        writer.write_fmt(format_args!(
            "Sequences producing significant alignments:\n\n"
        ))?;

        for hit in bucket {
            let (ident, len) = hit.identities();
            let pct = if len == 0 {
                0.0
            } else {
                ident as f64 / len as f64 * 100.0
            };

            writer.write_fmt(format_args!("Target: {}\n", hit.target))?;
            writer.write_fmt(format_args!("Length: {}\n", hit.target_len))?;
            writer.write_fmt(format_args!("Score: {}\n", hit.score))?;
            writer.write_fmt(format_args!(
                "Identities: {}/{} ({:.0}%)\n\n",
                ident, len, pct
            ))?;

            let wrapped = hit
                .aligned
                .as_bytes()
                .chunks(WRAP)
                .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
                .join("\n");
            writer.write_fmt(format_args!("{}\n\n", wrapped))?;
        }
    }

    Ok(())
}
