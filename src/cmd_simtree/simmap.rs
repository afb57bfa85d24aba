use super::utils;
use clap::*;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("simmap")
        .about("Tabulates SIMMAP state histories")
        .after_help(
            r###"
Prints the state history of every branch as TSV.

Output format:
* Segments (default), root end of each branch first:
  tree	node	label	state	time

* Time per state (--total), states with no time are skipped:
  tree	node	label	state	total

`tree` counts from 1 in input order. `node` is the position of the node
in preorder, the root being 0; the root has no branch and is not listed.
A plain branch length reads as one segment in state 0.

Examples:
1. Segments:
   simtree simmap tests/newick/simmap.nwk

2. Total time per state, allowing state ids up to 19:
   simtree simmap tests/newick/simmap.nwk --total --max-states 20
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
            Arg::new("total")
                .long("total")
                .action(ArgAction::SetTrue)
                .help("Sum the time spent in each state"),
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
    let is_total = args.get_flag("total");

    let trees = utils::read_trees(args)?;

    if is_total {
        writer.write_all(b"tree\tnode\tlabel\tstate\ttotal\n")?;
    } else {
        writer.write_all(b"tree\tnode\tlabel\tstate\ttime\n")?;
    }

    for (i, tree) in trees.iter().enumerate() {
        let root = match tree.get_root() {
            Some(root) => root,
            None => continue,
        };

        for (pos, id) in tree.preorder(root).into_iter().enumerate().skip(1) {
            let node = tree.get_node(id).unwrap();
            let history = &node.history;

            if is_total {
                for (state, total) in history.total_time.iter().enumerate() {
                    if *total > 0.0 {
                        writer.write_fmt(format_args!(
                            "{}\t{}\t{}\t{}\t{}\n",
                            i + 1,
                            pos,
                            node.label,
                            state,
                            total
                        ))?;
                    }
                }
            } else {
                for (state, time) in history.order.iter().zip(history.times.iter()) {
                    writer.write_fmt(format_args!(
                        "{}\t{}\t{}\t{}\t{}\n",
                        i + 1,
                        pos,
                        node.label,
                        state,
                        time
                    ))?;
                }
            }
        }
    }

    Ok(())
}
