use super::utils;
use clap::*;
use simtree::libs::phylo::WriteOptions;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("write")
        .about("Writes trees back as Newick")
        .after_help(
            r###"
Parses the trees and writes them out again, one per line.

Notes:
* Labels are NEXUS-quoted: a label is quoted if it does not start with a
  letter or contains characters other than letters, digits, space, `_`
  and `.`. Otherwise spaces are written as `_`.
* `--no-quote` strips the quotes; the output may no longer be valid Newick.
* `--simmap` writes full state histories, `{state,time:state,time}`,
  instead of summed branch lengths.
* `--text` pretty-prints with the given indentation; `--compact` wins
  over it.
* The length of the branch above the root is never written.

Examples:
1. Normalize a tree:
   simtree write tests/newick/quoted.nwk

2. Keep the SIMMAP histories:
   simtree write tests/newick/simmap.nwk --simmap

3. Indented output:
   simtree write tests/newick/catarrhini.nwk --text "  "
"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .num_args(1)
                .index(1)
                .help("Input filename. [stdin] for standard input"),
        )
        .arg(
            Arg::new("no-quote")
                .long("no-quote")
                .action(ArgAction::SetTrue)
                .help("Strip quotes from labels"),
        )
        .arg(
            Arg::new("simmap")
                .long("simmap")
                .action(ArgAction::SetTrue)
                .help("Write SIMMAP histories instead of branch lengths"),
        )
        .arg(
            Arg::new("text")
                .long("text")
                .short('t')
                .num_args(1)
                .help("Indent with this text"),
        )
        .arg(
            Arg::new("compact")
                .long("compact")
                .short('c')
                .action(ArgAction::SetTrue)
                .help("Compact output (remove indentation)"),
        )
        .arg(utils::arg_max_states())
        .arg(
            Arg::new("outfile")
                .short('o')
                .long("outfile")
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let mut writer = intspan::writer(args.get_one::<String>("outfile").unwrap());

    let indent = if args.get_flag("compact") {
        ""
    } else {
        args.get_one::<String>("text").map(|s| s.as_str()).unwrap_or("")
    };
    let options = WriteOptions::default()
        .with_quoting(!args.get_flag("no-quote"))
        .with_simmap(args.get_flag("simmap"))
        .with_indent(indent);

    let trees = utils::read_trees(args)?;

    for tree in trees {
        tree.write_newick(&mut writer, &options)?;
    }

    Ok(())
}
