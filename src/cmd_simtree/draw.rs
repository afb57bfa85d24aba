use super::utils;
use clap::*;
use simtree::libs::phylo::DrawStyle;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("draw")
        .about("Draws trees as ASCII art")
        .after_help(
            r###"
Renders each tree as text, one line per leaf and one per internal edge.
Leaves are aligned in the rightmost column; internal labels follow the
edge that joins their first child.

Styles:
* ascii - `/`, `+`, `\`, `-` and `|` (default)
* box   - Unicode box-drawing characters

Examples:
1. Draw a tree:
   simtree draw tests/newick/abc.nwk

    /- A
   /+
   |\- B
   +
   \-- C

2. Box-drawing characters:
   simtree draw tests/newick/catarrhini.nwk --style box
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
            Arg::new("style")
                .long("style")
                .value_parser(["ascii", "box"])
                .default_value("ascii")
                .help("Glyph set"),
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

    let style = match args.get_one::<String>("style").unwrap().as_str() {
        "box" => DrawStyle::boxed(),
        _ => DrawStyle::default(),
    };

    let trees = utils::read_trees(args)?;

    for (i, mut tree) in trees.into_iter().enumerate() {
        // blank line between trees
        if i > 0 {
            writer.write_all(b"\n")?;
        }
        tree.draw_with(&mut writer, &style)?;
    }

    Ok(())
}
