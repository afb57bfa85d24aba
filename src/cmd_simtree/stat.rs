use super::utils;
use clap::*;
use itertools::Itertools;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("stat")
        .about("Prints statistics about trees")
        .after_help(
            r###"
Prints information about the trees in the input.

Input format:
* Newick trees filename or 'stdin'

Output format:
* Key-value pairs (TSV, default):
  Type	phylogram
  nodes	13
  leaves	7
  ...

* Tab-separated values (--style line), one line per tree

Notes:
* `simmap` counts branches whose history has more than one segment or
  any state other than 0.
* Branch lengths below 1e-6 count as zero in `max path`.

Examples:
1. Default statistics:
   simtree stat tests/newick/catarrhini.nwk

2. One line per tree:
   simtree stat tests/newick/forest.nwk --style line
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
                .value_parser(["col", "line"])
                .default_value("col")
                .help("Output style. [col] for key-value pairs, [line] for TSV"),
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

const KEYS: [&str; 11] = [
    "Type",
    "nodes",
    "leaves",
    "internals",
    "dichotomies",
    "leaf labels",
    "internal labels",
    "internal labels flag",
    "max path",
    "max depth",
    "simmap",
];

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let mut writer = intspan::writer(args.get_one::<String>("outfile").unwrap());
    let style = args.get_one::<String>("style").unwrap();

    let trees = utils::read_trees(args)?;

    if style == "line" {
        writer.write_fmt(format_args!("{}\n", KEYS.iter().join("\t")))?;
    }

    for mut tree in trees {
        tree.node_depths();

        let mut n_node = 0;
        let mut n_dichotomies = 0;
        let mut n_leaf_label = 0;
        let mut n_internal_label = 0;
        let mut n_simmap = 0;
        let mut max_depth = 0;

        if let Some(root) = tree.get_root() {
            for id in tree.preorder(root) {
                let node = tree.get_node(id).unwrap();
                n_node += 1;

                if !node.is_leaf && tree.children(id).count() == 2 {
                    n_dichotomies += 1;
                }

                if node.has_label() {
                    if node.is_leaf {
                        n_leaf_label += 1;
                    } else {
                        n_internal_label += 1;
                    }
                }

                let history = &node.history;
                if id != root
                    && (history.len() > 1 || history.order.iter().any(|&state| state != 0))
                {
                    n_simmap += 1;
                }

                max_depth = max_depth.max(node.depth);
            }
        }

        let tree_type = if tree.has_edge_lengths() {
            "phylogram"
        } else {
            "cladogram"
        };

        let values = [
            tree_type.to_string(),
            n_node.to_string(),
            tree.num_leaves().to_string(),
            tree.num_internals().to_string(),
            n_dichotomies.to_string(),
            n_leaf_label.to_string(),
            n_internal_label.to_string(),
            if tree.has_internal_labels() { "Yes" } else { "No" }.to_string(),
            format!("{}", tree.max_path_length()),
            max_depth.to_string(),
            n_simmap.to_string(),
        ];

        if style == "line" {
            writer.write_fmt(format_args!("{}\n", values.iter().join("\t")))?;
        } else {
            for (key, value) in KEYS.iter().zip(values.iter()) {
                writer.write_fmt(format_args!("{}\t{}\n", key, value))?;
            }
        }
    }

    Ok(())
}
