use super::utils;
use clap::*;
use simtree::libs::phylo::WriteOptions;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("subtree")
        .about("Extracts the subtree below a node")
        .after_help(
            r###"
Copies the clade rooted at the named node into a tree of its own and
writes it as Newick. Labels, branch lengths and SIMMAP histories are
kept; the branch above the new root is dropped.

Trees without a node of that name are skipped with a warning.

Examples:
1. Extract the great apes:
   simtree subtree tests/newick/catarrhini.nwk -n Hominidae

2. Keep SIMMAP histories:
   simtree subtree tests/newick/simmap.nwk -n AB --simmap
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
            Arg::new("node")
                .long("node")
                .short('n')
                .num_args(1)
                .required(true)
                .help("Label of the subtree root"),
        )
        .arg(
            Arg::new("simmap")
                .long("simmap")
                .action(ArgAction::SetTrue)
                .help("Write SIMMAP histories instead of branch lengths"),
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

    let name = args.get_one::<String>("node").unwrap().replace('_', " ");
    let options = WriteOptions::default().with_simmap(args.get_flag("simmap"));

    let trees = utils::read_trees(args)?;

    for tree in trees {
        let id = match tree.get_node_by_label(&name) {
            Some(id) => id,
            None => {
                log::warn!("Node {} not found", name);
                continue;
            }
        };

        let sub = tree.copy_subtree(id)?;
        sub.write_newick(&mut writer, &options)?;
    }

    Ok(())
}
