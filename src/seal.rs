extern crate clap;
use clap::*;

mod cmd_seal;

fn main() -> anyhow::Result<()> {
    let app = Command::new("seal")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`seal` - SEed-and-extend ALigner")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_seal::search::make_subcommand())
        .after_help(
            r###"Subcommands:

* search - heuristic search of DNA queries against a sequence database

"###,
        );

    // Check which subcomamnd the user ran...
    match app.get_matches().subcommand() {
        Some(("search", sub_matches)) => cmd_seal::search::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
