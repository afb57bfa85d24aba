use super::utils;
use clap::*;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("label")
        .about("Labels in the trees")
        .after_help(
            r###"
Prints the leaf labels, left to right, one per line.

Notes:
* `--internal` also prints labels of internal nodes, in preorder.
  Empty labels produce no output.
* `--depth` adds a column with the number of edges from the root.
* `--path` adds a column with the cumulative branch length from the
  root; lengths below 1e-6 count as zero.

Examples:
1. List leaves:
   simtree label tests/newick/catarrhini.nwk

2. All labels with their distance to the root:
   simtree label tests/newick/catarrhini.nwk --internal --path
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
            Arg::new("internal")
                .long("internal")
                .short('I')
                .action(ArgAction::SetTrue)
                .help("Include labels of internal nodes"),
        )
        .arg(
            Arg::new("depth")
                .long("depth")
                .action(ArgAction::SetTrue)
                .help("Print the depth of each node"),
        )
        .arg(
            Arg::new("path")
                .long("path")
                .action(ArgAction::SetTrue)
                .help("Print the path length of each node"),
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

    let is_internal = args.get_flag("internal");
    let is_depth = args.get_flag("depth");
    let is_path = args.get_flag("path");

    let trees = utils::read_trees(args)?;

    for mut tree in trees {
        let root = match tree.get_root() {
            Some(root) => root,
            None => continue,
        };
        tree.node_depths();

        for id in tree.preorder(root) {
            let node = tree.get_node(id).unwrap();
            if !node.has_label() || (!node.is_leaf && !is_internal) {
                continue;
            }

            let mut line = node.label.clone();
            if is_depth {
                line.push_str(&format!("\t{}", node.depth));
            }
            if is_path {
                line.push_str(&format!("\t{}", node.path_length));
            }
            writer.write_fmt(format_args!("{}\n", line))?;
        }
    }

    Ok(())
}
