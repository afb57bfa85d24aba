use super::error::{ParseError, ParseErrorKind};
use super::node::{NodeId, StateHistory};
use super::token::{Token, Tokenizer};
use super::tree::Tree;
use log::{debug, trace, warn};

/// Default capacity of the per-branch SIMMAP state table
pub const DEFAULT_MAX_STATES: usize = 10;

/// Knobs for reading tree descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// State ids in SIMMAP blocks must be below this
    pub max_states: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_states: DEFAULT_MAX_STATES,
        }
    }
}

impl ParserConfig {
    pub fn with_max_states(mut self, max_states: usize) -> Self {
        self.max_states = max_states;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    GetName,
    GetInternode,
    NextMove,
    FinishChildren,
    Accepted,
}

// ================================================================================================
// Builder
// ================================================================================================

/// The finite-state machine that turns tokens into nodes.
///
/// `cur` is the node being filled in; `stack` holds the ancestors whose
/// parenthesized groups are still open.
struct Builder<'a, 't> {
    tree: &'t mut Tree,
    tokens: Tokenizer<'a>,
    config: ParserConfig,
    stack: Vec<NodeId>,
    cur: NodeId,
    token: Token,
}

impl<'a, 't> Builder<'a, 't> {
    fn new(tree: &'t mut Tree, input: &'a str, config: ParserConfig, root: NodeId) -> Self {
        Self {
            tree,
            tokens: Tokenizer::new(input),
            config,
            stack: Vec::new(),
            cur: root,
            token: Token::EndOfString,
        }
    }

    fn fail(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            offset: self.tokens.position(),
        }
    }

    fn advance(&mut self) {
        self.token = self.tokens.next_token();
    }

    /// Next token that is not whitespace
    fn next_significant(&mut self) -> Token {
        loop {
            let token = self.tokens.next_token();
            if !token.is_blank() {
                return token;
            }
        }
    }

    fn run(&mut self) -> Result<(), ParseError> {
        let mut state = State::GetName;
        self.advance();

        while state != State::Accepted {
            if self.token.is_blank() {
                self.advance();
                continue;
            }
            trace!("{:?} <- {:?} {:?}", state, self.token, self.tokens.lexeme());

            state = match state {
                State::GetName => self.get_name()?,
                State::GetInternode => self.get_internode()?,
                State::NextMove => self.next_move()?,
                State::FinishChildren => self.finish_children()?,
                State::Accepted => State::Accepted,
            };
        }

        Ok(())
    }

    fn get_name(&mut self) -> Result<State, ParseError> {
        match self.token {
            Token::String | Token::Number => {
                self.make_leaf();
                self.advance();
                Ok(State::GetInternode)
            }
            Token::LPar => Ok(State::NextMove),
            Token::EndOfString => Err(self.fail(ParseErrorKind::UnexpectedEnd)),
            _ => Err(self.fail(ParseErrorKind::Syntax)),
        }
    }

    fn get_internode(&mut self) -> Result<State, ParseError> {
        match self.token {
            Token::Colon | Token::Comma | Token::RPar | Token::Semicolon => Ok(State::NextMove),
            Token::EndOfString => Err(self.fail(ParseErrorKind::UnexpectedEnd)),
            _ => Err(self.fail(ParseErrorKind::Syntax)),
        }
    }

    fn next_move(&mut self) -> Result<State, ParseError> {
        match self.token {
            Token::Colon => {
                self.branch_info()?;
                self.advance();
                Ok(State::NextMove)
            }
            // The next node is a sibling of cur and a child of the stack top
            Token::Comma => {
                self.make_sibling()?;
                self.advance();
                Ok(State::GetName)
            }
            // The next node is the first child of cur
            Token::LPar => {
                self.make_child();
                self.advance();
                Ok(State::GetName)
            }
            // All children of the stack top are read
            Token::RPar => {
                self.close_group()?;
                self.advance();
                Ok(State::FinishChildren)
            }
            Token::Semicolon => {
                if self.stack.is_empty() {
                    Ok(State::Accepted)
                } else {
                    Err(self.fail(ParseErrorKind::StackNotEmpty))
                }
            }
            Token::EndOfString => Err(self.fail(ParseErrorKind::UnexpectedEnd)),
            _ => Err(self.fail(ParseErrorKind::Syntax)),
        }
    }

    fn finish_children(&mut self) -> Result<State, ParseError> {
        match self.token {
            Token::String | Token::Number => {
                self.tree.has_internal_labels = true;
                let label = self.tokens.lexeme().to_string();
                self.tree.nodes[self.cur].label = label;
                self.advance();
                Ok(State::FinishChildren)
            }
            Token::Colon => {
                self.branch_info()?;
                self.advance();
                Ok(State::FinishChildren)
            }
            Token::RPar => {
                self.close_group()?;
                self.advance();
                Ok(State::FinishChildren)
            }
            Token::Comma => {
                self.make_sibling()?;
                self.advance();
                Ok(State::GetName)
            }
            Token::Semicolon => Ok(State::NextMove),
            Token::EndOfString if !self.stack.is_empty() => {
                Err(self.fail(ParseErrorKind::UnexpectedEnd))
            }
            _ => {
                if self.stack.is_empty() {
                    Err(self.fail(ParseErrorKind::ExpectedSemicolon))
                } else {
                    Err(self.fail(ParseErrorKind::Syntax))
                }
            }
        }
    }

    // --- Node construction ---

    fn make_leaf(&mut self) {
        self.tree.leaves += 1;
        let leaf_number = self.tree.leaves;
        let label = self.tokens.lexeme().to_string();

        let node = &mut self.tree.nodes[self.cur];
        node.is_leaf = true;
        node.leaf_number = leaf_number;
        node.weight = 1;
        node.degree = 0;
        node.label = label;
    }

    fn make_child(&mut self) {
        self.tree.internals += 1;
        self.stack.push(self.cur);

        let q = self.tree.new_node();
        self.tree.nodes[self.cur].child = Some(q);
        self.tree.nodes[self.cur].degree += 1;
        self.tree.nodes[q].ancestor = Some(self.cur);
        self.cur = q;
    }

    fn make_sibling(&mut self) -> Result<(), ParseError> {
        let top = match self.stack.last() {
            Some(&top) => top,
            None => return Err(self.fail(ParseErrorKind::MissingLeftParen)),
        };

        let q = self.tree.new_node();
        let weight = self.tree.nodes[self.cur].weight;
        self.tree.nodes[self.cur].sibling = Some(q);
        self.tree.nodes[q].ancestor = Some(top);
        self.tree.nodes[top].weight += weight;
        self.tree.nodes[top].degree += 1;
        self.cur = q;

        Ok(())
    }

    fn close_group(&mut self) -> Result<(), ParseError> {
        let q = match self.stack.pop() {
            Some(q) => q,
            None => return Err(self.fail(ParseErrorKind::Unbalanced)),
        };

        let weight = self.tree.nodes[self.cur].weight;
        self.tree.nodes[q].weight += weight;
        self.cur = q;

        Ok(())
    }

    // --- Branch information ---

    /// Reads what follows a `:`, either a plain length or a `{...}` SIMMAP block.
    fn branch_info(&mut self) -> Result<(), ParseError> {
        match self.next_significant() {
            Token::Number => {
                let length = self.number()?;
                self.tree.nodes[self.cur].set_edge_length(length);
            }
            Token::Other if self.tokens.lexeme() == "{" => {
                let history = self.simmap()?;
                self.tree.nodes[self.cur].set_history(history);
            }
            Token::EndOfString => return Err(self.fail(ParseErrorKind::UnexpectedEnd)),
            _ => return Err(self.fail(ParseErrorKind::Syntax)),
        }
        self.tree.has_edge_lengths = true;

        Ok(())
    }

    // {state,time:state,time:...}, states root end first
    fn simmap(&mut self) -> Result<StateHistory, ParseError> {
        let mut history = StateHistory::with_capacity(self.config.max_states);

        loop {
            let mut token = self.next_significant();
            if token == Token::Other && self.tokens.lexeme() == "}" && !history.is_empty() {
                break;
            }
            if token == Token::Colon {
                token = self.next_significant();
            }

            self.expect(token, Token::Number)?;
            let state_at = self.tokens.position();
            let state = self
                .tokens
                .lexeme()
                .parse::<usize>()
                .map_err(|_| self.fail(ParseErrorKind::Syntax))?;

            let token = self.next_significant();
            self.expect(token, Token::Comma)?;

            let token = self.next_significant();
            self.expect(token, Token::Number)?;
            let time = self.number()?;

            if !history.push(state, time) {
                return Err(ParseError {
                    kind: ParseErrorKind::TooManyCategories,
                    offset: state_at,
                });
            }
        }

        Ok(history)
    }

    fn expect(&self, found: Token, wanted: Token) -> Result<(), ParseError> {
        if found == wanted {
            Ok(())
        } else if found == Token::EndOfString {
            Err(self.fail(ParseErrorKind::UnexpectedEnd))
        } else {
            Err(self.fail(ParseErrorKind::Syntax))
        }
    }

    fn number(&self) -> Result<f64, ParseError> {
        self.tokens
            .lexeme()
            .parse::<f64>()
            .map_err(|_| self.fail(ParseErrorKind::Syntax))
    }
}

// ================================================================================================
// Entry Points
// ================================================================================================

impl Tree {
    /// Replace the content of this tree with the parsed description.
    ///
    /// On failure the partially built structure is left in place and the
    /// error kind is remembered, see [`Tree::error`].
    pub fn parse(&mut self, input: &str) -> Result<(), ParseError> {
        self.parse_with(input, &ParserConfig::default())
    }

    pub fn parse_with(&mut self, input: &str, config: &ParserConfig) -> Result<(), ParseError> {
        self.reset();
        let root = self.new_node();
        self.root = Some(root);

        let outcome = Builder::new(self, input, *config, root).run();

        match outcome {
            Ok(()) => {
                self.nodes[root].weight = self.leaves;
                self.compute_path_lengths();
                debug!(
                    "Accepted tree: {} leaves, {} internal nodes",
                    self.leaves, self.internals
                );
                Ok(())
            }
            Err(e) => {
                warn!("Rejected tree description: {}", e);
                self.error = Some(e.kind);
                Err(e)
            }
        }
    }

    /// Parse a single tree description into a new Tree.
    ///
    /// # Example
    /// ```
    /// use simtree::libs::phylo::Tree;
    ///
    /// let tree = Tree::from_newick("(A:0.1,B:0.2)Root;").unwrap();
    /// assert_eq!(tree.num_leaves(), 2);
    /// assert_eq!(tree.num_internals(), 1);
    ///
    /// let err = Tree::from_newick("(A,B;").unwrap_err();
    /// assert_eq!(err.offset, 4);
    /// ```
    pub fn from_newick(input: &str) -> Result<Self, ParseError> {
        Self::from_newick_with(input, &ParserConfig::default())
    }

    pub fn from_newick_with(input: &str, config: &ParserConfig) -> Result<Self, ParseError> {
        let mut tree = Tree::new();
        tree.parse_with(input, config)?;
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn leaf_labels(tree: &Tree) -> Vec<String> {
        tree.get_leaves()
            .into_iter()
            .map(|id| tree.get_node(id).unwrap().label.clone())
            .collect()
    }

    #[test]
    fn test_parser_simple() {
        let tree = Tree::from_newick("(A:1,B:2);").unwrap();
        assert_eq!(tree.num_leaves(), 2);
        assert_eq!(tree.num_internals(), 1);
        assert!(tree.has_edge_lengths());
        assert!(!tree.has_internal_labels());
        assert_eq!(leaf_labels(&tree), vec!["A", "B"]);

        let root = tree.get_root().unwrap();
        let lengths: Vec<f64> = tree
            .children(root)
            .map(|id| tree.get_node(id).unwrap().edge_length)
            .collect();
        assert_eq!(lengths, vec![1.0, 2.0]);
        assert_eq!(tree.get_node(root).unwrap().weight, 2);
        assert_eq!(tree.get_node(root).unwrap().degree, 2);
    }

    #[test]
    fn test_parser_internal_label() {
        let tree = Tree::from_newick("(A,(B,C)D);").unwrap();
        assert_eq!(tree.num_leaves(), 3);
        assert_eq!(tree.num_internals(), 2);
        assert!(tree.has_internal_labels());
        assert!(!tree.has_edge_lengths());

        let d = tree.find_nodes(|n| n.label == "D");
        assert_eq!(d.len(), 1);
        let d = tree.get_node(d[0]).unwrap();
        assert!(!d.is_leaf);
        assert_eq!(d.weight, 2);
        assert_eq!(d.degree, 2);
    }

    #[test]
    fn test_parser_leaf_numbers() {
        let tree = Tree::from_newick("((x,y),z);").unwrap();
        let numbers: Vec<(String, usize)> = tree
            .get_leaves()
            .into_iter()
            .map(|id| {
                let n = tree.get_node(id).unwrap();
                (n.label.clone(), n.leaf_number)
            })
            .collect();
        assert_eq!(
            numbers,
            vec![
                ("x".to_string(), 1),
                ("y".to_string(), 2),
                ("z".to_string(), 3)
            ]
        );
    }

    #[test]
    fn test_parser_single_leaf() {
        let tree = Tree::from_newick("A;").unwrap();
        assert_eq!(tree.num_leaves(), 1);
        assert_eq!(tree.num_internals(), 0);
        let root = tree.get_node(tree.get_root().unwrap()).unwrap();
        assert!(root.is_leaf);
        assert_eq!(root.label, "A");
    }

    #[test]
    fn test_parser_whitespace() {
        let input = "
        (
            A : 0.1,
            'Homo sapiens' : 0.2
        ) Root : 1.5 ;
        ";
        let tree = Tree::from_newick(input).unwrap();
        assert_eq!(leaf_labels(&tree), vec!["A", "Homo sapiens"]);
        let root = tree.get_node(tree.get_root().unwrap()).unwrap();
        assert_eq!(root.label, "Root");
        assert_eq!(root.edge_length, 1.5);
    }

    #[test]
    fn test_parser_numeric_labels() {
        let tree = Tree::from_newick("((1,2)95,3);").unwrap();
        assert_eq!(leaf_labels(&tree), vec!["1", "2", "3"]);
        assert_eq!(tree.find_nodes(|n| n.label == "95").len(), 1);
    }

    #[test]
    fn test_parser_simmap() {
        let tree = Tree::from_newick("(A:{0,1.5:1,0.5});").unwrap();
        assert_eq!(tree.num_leaves(), 1);
        assert!(tree.has_edge_lengths());

        let a = tree.get_leaves()[0];
        let a = tree.get_node(a).unwrap();
        assert_eq!(a.history.order, vec![0, 1]);
        assert_eq!(a.history.times, vec![1.5, 0.5]);
        assert_relative_eq!(a.history.total(), a.edge_length);
        assert_relative_eq!(a.edge_length, 2.0);
        assert_eq!(a.history.total_time.len(), DEFAULT_MAX_STATES);
        assert_relative_eq!(a.history.time_in(0), 1.5);
        assert_relative_eq!(a.history.time_in(1), 0.5);
    }

    #[test]
    fn test_parser_simmap_repeated_state() {
        let tree = Tree::from_newick("((A:{0,1:2,0.5:0,0.25},B:1):{ 1 , 3 },C:2);").unwrap();
        let a = tree.find_nodes(|n| n.label == "A")[0];
        let a = tree.get_node(a).unwrap();
        assert_eq!(a.history.order, vec![0, 2, 0]);
        assert_relative_eq!(a.history.time_in(0), 1.25);
        assert_relative_eq!(a.history.time_in(2), 0.5);
        assert_relative_eq!(a.edge_length, 1.75);

        let ab = tree.get_node(a.ancestor.unwrap()).unwrap();
        assert_eq!(ab.history.order, vec![1]);
        assert_relative_eq!(ab.edge_length, 3.0);

        // plain lengths become single-segment histories
        let b = tree.find_nodes(|n| n.label == "B")[0];
        let b = tree.get_node(b).unwrap();
        assert_eq!(b.history, StateHistory::single(1.0));
    }

    #[test]
    fn test_parser_simmap_capacity() {
        let err = Tree::from_newick("(A:{12,1.0});").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TooManyCategories);
        // reported at the state, not at the time that follows
        assert_eq!(err.offset, 4);

        let err = Tree::from_newick("(A:{0,0.5:10,1.0});").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TooManyCategories);
        assert_eq!(err.offset, 10);

        let config = ParserConfig::default().with_max_states(20);
        let tree = Tree::from_newick_with("(A:{12,1.0});", &config).unwrap();
        let a = tree.get_leaves()[0];
        assert_relative_eq!(tree.get_node(a).unwrap().history.time_in(12), 1.0);
    }

    #[test]
    fn test_parser_path_lengths() {
        let tree = Tree::from_newick("((A:1,B:2):0.5,C:-3);").unwrap();
        let path = |label: &str| {
            let id = tree.find_nodes(|n| n.label == label)[0];
            tree.get_node(id).unwrap().path_length
        };
        assert_relative_eq!(path("A"), 1.5);
        assert_relative_eq!(path("B"), 2.5);
        // negative lengths are floored
        assert_relative_eq!(path("C"), 0.0);
        assert_relative_eq!(tree.max_path_length(), 2.5);
    }

    #[test]
    fn test_parser_errors() {
        let cases = [
            ("(A,B;", ParseErrorKind::StackNotEmpty, 4),
            ("(A,B", ParseErrorKind::UnexpectedEnd, 4),
            ("", ParseErrorKind::UnexpectedEnd, 0),
            ("A,B;", ParseErrorKind::MissingLeftParen, 1),
            ("A);", ParseErrorKind::Unbalanced, 1),
            ("(A,B))", ParseErrorKind::Unbalanced, 5),
            ("(A,B)", ParseErrorKind::ExpectedSemicolon, 5),
            ("(A,B)(", ParseErrorKind::ExpectedSemicolon, 5),
            ("(A,[B]);", ParseErrorKind::Syntax, 3),
            ("(A B);", ParseErrorKind::Syntax, 3),
            ("(A:x,B);", ParseErrorKind::Syntax, 3),
            ("(A:{0,1.0,B);", ParseErrorKind::Syntax, 9),
            ("(A:{0,1.0", ParseErrorKind::UnexpectedEnd, 9),
            ("(A:{});", ParseErrorKind::Syntax, 4),
        ];

        for (input, kind, offset) in cases {
            let err = Tree::from_newick(input).unwrap_err();
            assert_eq!((err.kind, err.offset), (kind, offset), "input {:?}", input);
        }
    }

    #[test]
    fn test_parser_error_is_recorded() {
        let mut tree = Tree::new();
        assert_eq!(tree.error(), None);
        assert_eq!(tree.error_message(), "No error");

        assert!(tree.parse("((A,B);").is_err());
        assert_eq!(tree.error(), Some(ParseErrorKind::StackNotEmpty));
        assert_eq!(tree.error_message(), "Stack not empty");

        // reparsing clears the previous outcome
        tree.parse("(A,B);").unwrap();
        assert_eq!(tree.error(), None);
        assert_eq!(tree.num_leaves(), 2);
    }
}
