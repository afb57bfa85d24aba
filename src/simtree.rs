extern crate clap;
use clap::*;

mod cmd_simtree;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let app = Command::new("simtree")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`simtree` - Phylogenetic trees with SIMMAP state histories")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_simtree::draw::make_subcommand())
        .subcommand(cmd_simtree::label::make_subcommand())
        .subcommand(cmd_simtree::prune::make_subcommand())
        .subcommand(cmd_simtree::simmap::make_subcommand())
        .subcommand(cmd_simtree::stat::make_subcommand())
        .subcommand(cmd_simtree::subtree::make_subcommand())
        .subcommand(cmd_simtree::write::make_subcommand())
        .after_help(
            r###"Subcommand groups:

* info: stat / label / simmap
* ops:  prune / subtree
* viz:  draw / write

Input files hold one or more Newick trees, each ending with `;`.
Branch lengths may be SIMMAP histories, e.g. `A:{0,0.5:1,1.25}`.

Set RUST_LOG=debug for progress messages on stderr.

"###,
        );

    // Check which subcomamnd the user ran...
    match app.get_matches().subcommand() {
        Some(("draw", sub_matches)) => cmd_simtree::draw::execute(sub_matches),
        Some(("label", sub_matches)) => cmd_simtree::label::execute(sub_matches),
        Some(("prune", sub_matches)) => cmd_simtree::prune::execute(sub_matches),
        Some(("simmap", sub_matches)) => cmd_simtree::simmap::execute(sub_matches),
        Some(("stat", sub_matches)) => cmd_simtree::stat::execute(sub_matches),
        Some(("subtree", sub_matches)) => cmd_simtree::subtree::execute(sub_matches),
        Some(("write", sub_matches)) => cmd_simtree::write::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
