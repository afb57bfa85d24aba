use super::utils;
use clap::*;
use simtree::libs::phylo::WriteOptions;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("prune")
        .about("Removes leaves from the trees")
        .after_help(
            r###"
Removes the named leaves and writes the remaining tree.

Notes:
* Leaves can be given by name (`--node`) or in a file (`--file`).
* Topology changes:
    * If the parent of a removed leaf had two children, the parent goes
      too and the other child takes its place.
    * In a polytomy only the leaf itself is removed.
* Removing every leaf leaves an empty tree, written as `;`.
* Unknown names are ignored.

Examples:
1. Remove specific leaves:
   simtree prune tests/newick/catarrhini.nwk -n Homo -n Pan

2. Remove leaves listed in a file:
   simtree prune tests/newick/catarrhini.nwk -f remove.txt
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
                .action(ArgAction::Append)
                .help("Leaf label"),
        )
        .arg(
            Arg::new("file")
                .long("file")
                .short('f')
                .num_args(1)
                .help("A file contains leaf labels"),
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
    //----------------------------
    // Args
    //----------------------------
    let mut writer = intspan::writer(args.get_one::<String>("outfile").unwrap());

    let names = utils::match_names(args);
    let options = WriteOptions::default().with_simmap(args.get_flag("simmap"));

    let trees = utils::read_trees(args)?;

    for mut tree in trees {
        //----------------------------
        // Operating
        //----------------------------
        tree.rebuild_index()?;
        let targets: Vec<_> = names.iter().filter_map(|name| tree.find_leaf(name)).collect();

        log::debug!("Removing {} leaves", targets.len());
        for id in targets {
            tree.remove_node(id)?;
        }

        tree.refresh_derived();
        tree.renumber_leaves();
        tree.compute_path_lengths();

        //----------------------------
        // Output
        //----------------------------
        tree.write_newick(&mut writer, &options)?;
    }

    Ok(())
}
