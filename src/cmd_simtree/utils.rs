use clap::{value_parser, Arg, ArgMatches};
use simtree::libs::phylo::reader;
use simtree::libs::phylo::{ParserConfig, Tree};
use std::collections::BTreeSet;

pub fn arg_max_states() -> Arg {
    Arg::new("max-states")
        .long("max-states")
        .num_args(1)
        .default_value("10")
        .value_parser(value_parser!(usize))
        .help("Capacity of the SIMMAP state table; state ids must be below it")
}

// Trees from `infile`, parsed with `--max-states`
pub fn read_trees(args: &ArgMatches) -> anyhow::Result<Vec<Tree>> {
    let infile = args.get_one::<String>("infile").unwrap();
    let max_states = *args.get_one::<usize>("max-states").unwrap();

    let config = ParserConfig::default().with_max_states(max_states);
    reader::from_file_with(infile, &config)
}

// Labels supplied by --node and --file.
// Underscores read as spaces, the same as in unquoted Newick labels.
pub fn match_names(args: &ArgMatches) -> BTreeSet<String> {
    let mut names = BTreeSet::new();

    if args.contains_id("node") {
        for name in args.get_many::<String>("node").unwrap() {
            names.insert(name.replace('_', " "));
        }
    }

    if args.contains_id("file") {
        let file = args.get_one::<String>("file").unwrap();
        for name in intspan::read_first_column(file) {
            names.insert(name.replace('_', " "));
        }
    }

    names
}
