//! Incremental AST construction driven by a linear stream of parser actions.
//!
//! The external grammar never recurses into the builder: every recognized
//! rule maps to one action. `begin_*` actions open a node on the tracer,
//! `append_*` / `set_name` mutate the open nodes and [`Builder::attach`]
//! moves a completed node into the next free field of its parent.
//!
//! Actions that need an enclosing node of some kind search outward through
//! the open nodes. When none is found a [`Diagnostic`] is recorded and the
//! action does nothing. Only stack underflow during a rewind is fatal.

mod diagnostic;
pub mod script;


pub use diagnostic::{BuildError, Diagnostic, Result};

use crate::ast::*;
use crate::tracer::Tracer;

/// Outcome of a finished construction.
#[derive(Debug)]
pub struct Build {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Default)]
pub struct Builder {
    session: Session,
    tracer: Tracer<Node>,
    diagnostics: Vec<Diagnostic>,
    aborted: bool,
}

fn is_expression(node: &Node) -> bool {
    matches!(node, Node::Expression(_))
}

fn is_switch(node: &Node) -> bool {
    matches!(node, Node::Switch(_))
}

fn is_loop(node: &Node) -> bool {
    matches!(node, Node::Loop(_))
}

fn is_function(node: &Node) -> bool {
    matches!(node, Node::Function(_))
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Node> {
        self.tracer.current()
    }

    pub fn depth(&self) -> usize {
        self.tracer.depth()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    fn current_kind(&self) -> Option<NodeKind> {
        self.tracer.current().map(Node::kind)
    }

    fn unexpected_top(&mut self, action: &'static str, expected: NodeKind) {
        let found = self.current_kind();
        self.report(Diagnostic::UnexpectedTop {
            action,
            expected,
            found,
        });
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.aborted {
            Err(BuildError::Aborted)
        } else {
            Ok(())
        }
    }

    fn open(&mut self, node: Node) {
        log::trace!("open {} {}", node.kind(), node.id());
        self.tracer.push(node);
    }

    pub fn begin_program(&mut self) {
        let node = Node::Program(Program::new(&mut self.session));
        self.open(node);
    }

    pub fn begin_function(&mut self) {
        let node = Node::Function(FunctionDeclaration::new(&mut self.session));
        self.open(node);
    }

    pub fn begin_block(&mut self) {
        let node = Node::Block(Block::new(&mut self.session));
        self.open(node);
    }

    /// Opens the body of a switch case or of the default branch.
    pub fn begin_switch_block(&mut self) {
        self.begin_block();
    }

    pub fn begin_assignment(&mut self) {
        let node = Node::Assignment(Assignment::new(&mut self.session));
        self.open(node);
    }

    pub fn begin_return(&mut self) {
        let node = Node::Return(Return::new(&mut self.session));
        self.open(node);
    }

    pub fn begin_loop(&mut self) {
        let node = Node::Loop(Loop::new(&mut self.session));
        self.open(node);
    }

    pub fn begin_conditional(&mut self) {
        let node = Node::Conditional(Conditional::new(&mut self.session));
        self.open(node);
    }

    pub fn begin_switch(&mut self) {
        let node = Node::Switch(Switch::new(&mut self.session));
        self.open(node);
    }

    pub fn begin_expression(&mut self) {
        let node = Node::Expression(Expression::new(&mut self.session));
        self.open(node);
    }

    /// Opens a bare identifier; name it with [`Builder::set_name`].
    pub fn begin_identifier(&mut self) {
        let node = Node::Identifier(Identifier::new(&mut self.session, Name::new()));
        self.open(node);
    }

    /// The target is the innermost switch open right now. Without one the
    /// break is still created, with no target.
    pub fn begin_break(&mut self) {
        let target = self.tracer.find_last(is_switch).map(Node::id);
        if target.is_none() {
            self.report(Diagnostic::MissingContext {
                action: "begin-break",
                expected: NodeKind::Switch,
                payload: "break".into(),
            });
        }
        let node = Node::Break(Break::new(&mut self.session, target));
        self.open(node);
    }

    pub fn begin_loop_exit(&mut self) {
        let target = self.tracer.find_last(is_loop).map(Node::id);
        if target.is_none() {
            self.report(Diagnostic::MissingContext {
                action: "begin-loop-exit",
                expected: NodeKind::Loop,
                payload: "exit".into(),
            });
        }
        let node = Node::LoopExit(LoopExit::new(&mut self.session, target));
        self.open(node);
    }

    /// Names the node on top: identifier, assignment target, loop variable
    /// or function.
    pub fn set_name(&mut self, name: &str) {
        match self.tracer.current_mut() {
            Some(Node::Identifier(id)) => id.name = name.to_owned(),
            Some(Node::Assignment(a)) => a.target = name.to_owned(),
            Some(Node::Loop(l)) => l.var = name.to_owned(),
            Some(Node::Function(f)) => f.name = name.to_owned(),
            _ => {
                let found = self.current_kind();
                self.report(Diagnostic::NotNamed {
                    found,
                    name: name.to_owned(),
                });
            }
        }
    }

    pub fn add_parameter(&mut self, name: &str) {
        match self.tracer.find_last_mut(is_function) {
            Some(Node::Function(f)) => f.params.push(name.to_owned()),
            _ => self.report(Diagnostic::MissingContext {
                action: "add-parameter",
                expected: NodeKind::Function,
                payload: name.to_owned(),
            }),
        }
    }

    fn missing_expression(&mut self, action: &'static str, payload: String) -> bool {
        if self.tracer.find_last(is_expression).is_some() {
            return false;
        }
        self.report(Diagnostic::MissingContext {
            action,
            expected: NodeKind::Expression,
            payload,
        });
        true
    }

    fn push_token(&mut self, token: Token) {
        if let Some(Node::Expression(expression)) = self.tracer.find_last_mut(is_expression) {
            expression.add_token(token);
        }
    }

    /// Appends a leaf to the nearest open expression. Text starting with `_`
    /// names a variable, anything else is a constant.
    pub fn append_literal(&mut self, text: &str) {
        if self.missing_expression("append-literal", text.to_owned()) {
            return;
        }
        let token = if text.starts_with('_') {
            Token::Identifier(Identifier::new(&mut self.session, text))
        } else {
            Token::Constant(Constant::new(&mut self.session, text))
        };
        self.push_token(token);
    }

    pub fn append_operator(&mut self, operator: &str, unary: bool) {
        if self.missing_expression("append-operator", operator.to_owned()) {
            return;
        }
        if let Some(Node::Expression(expression)) = self.tracer.find_last_mut(is_expression) {
            expression.add_operator(operator, unary);
        }
    }

    /// Moves the identifier on top into the nearest open expression.
    pub fn append_identifier_token(&mut self) {
        let Some(Node::Identifier(identifier)) = self.tracer.current() else {
            self.unexpected_top("append-identifier-token", NodeKind::Identifier);
            return;
        };
        let payload = identifier.name.clone();
        if self.missing_expression("append-identifier-token", payload) {
            return;
        }
        if let Some(Node::Identifier(identifier)) = self.tracer.pop() {
            self.push_token(Token::Identifier(identifier));
        }
    }

    /// Moves the finished call on top into the nearest open expression.
    pub fn append_call(&mut self) {
        let Some(Node::Call(call)) = self.tracer.current() else {
            self.unexpected_top("append-call", NodeKind::Call);
            return;
        };
        let payload = call.name.clone();
        if self.missing_expression("append-call", payload) {
            return;
        }
        if let Some(Node::Call(call)) = self.tracer.pop() {
            self.push_token(Token::Call(call));
        }
    }

    /// Reinterprets the bare identifier on top as a call with no arguments
    /// yet; arguments are attached afterwards.
    pub fn identifier_to_call(&mut self) {
        if !matches!(self.tracer.current(), Some(Node::Identifier(_))) {
            self.unexpected_top("identifier-to-call", NodeKind::Identifier);
            return;
        }
        if let Some(Node::Identifier(identifier)) = self.tracer.pop() {
            let call = Call::new(&mut self.session, identifier.name);
            self.open(Node::Call(call));
        }
    }

    /// Finalizes the expression on top. Nodes pushed since the latest
    /// waypoint are spliced into it first. If the node below is an open
    /// expression too, the finished tokens are appended to it and the child
    /// wrapper disappears.
    pub fn end_expression(&mut self) -> Result<()> {
        self.ensure_alive()?;
        let had_waypoint = self.tracer.pending_waypoints() > 0;
        let children = match self.tracer.rewind() {
            Ok(children) => children,
            Err(e) => {
                self.aborted = true;
                return Err(e.into());
            }
        };

        let misfit = children
            .iter()
            .find(|c| !matches!(c, Node::Expression(_) | Node::Identifier(_) | Node::Call(_)))
            .map(Node::kind);
        let misfit = misfit.map(Diagnostic::NotAnExpressionPart).or_else(|| {
            (!matches!(self.tracer.current(), Some(Node::Expression(_)))).then(|| {
                Diagnostic::UnexpectedTop {
                    action: "end-expression",
                    expected: NodeKind::Expression,
                    found: self.current_kind(),
                }
            })
        });
        if let Some(diagnostic) = misfit {
            if had_waypoint {
                self.tracer.waypoint();
            }
            for child in children {
                self.tracer.push(child);
            }
            self.report(diagnostic);
            return Ok(());
        }

        let Some(Node::Expression(mut expression)) = self.tracer.pop() else {
            return Ok(());
        };
        for child in children {
            match child {
                Node::Expression(e) => expression.tokens.extend(e.tokens),
                Node::Identifier(id) => expression.add_token(Token::Identifier(id)),
                Node::Call(call) => expression.add_token(Token::Call(call)),
                _ => (),
            }
        }

        match self.tracer.current_mut() {
            Some(Node::Expression(parent)) => {
                log::trace!("splice expression {} into {}", expression.id, parent.id);
                parent.tokens.extend(expression.tokens);
            }
            _ => self.tracer.push(Node::Expression(expression)),
        }
        Ok(())
    }

    /// Hands the finished expression on top to the caller, e.g. as a case
    /// value for [`Builder::begin_switch_case`].
    pub fn pop_expression(&mut self) -> Option<Expression> {
        if !matches!(self.tracer.current(), Some(Node::Expression(_))) {
            self.unexpected_top("pop-expression", NodeKind::Expression);
            return None;
        }
        match self.tracer.pop() {
            Some(Node::Expression(expression)) => Some(expression),
            _ => None,
        }
    }

    /// With a value: opens a case, or adds one more match value to the case
    /// already open. Without a value: marks the default branch of the
    /// innermost switch.
    pub fn begin_switch_case(&mut self, value: Option<Expression>) {
        let in_case = matches!(self.tracer.current(), Some(Node::SwitchCase(_)));
        match value {
            Some(value) if in_case => {
                if let Some(Node::SwitchCase(case)) = self.tracer.current_mut() {
                    case.values.push(value);
                }
            }
            Some(value) => {
                if self.tracer.find_last(is_switch).is_none() {
                    self.report(Diagnostic::MissingContext {
                        action: "begin-switch-case",
                        expected: NodeKind::Switch,
                        payload: format!("case {}", value.id),
                    });
                    return;
                }
                let case = SwitchCase::new(&mut self.session, value);
                self.open(Node::SwitchCase(case));
            }
            None if in_case => self.report(Diagnostic::DefaultInsideCase),
            None => match self.tracer.find_last_mut(is_switch) {
                Some(Node::Switch(switch)) => switch.default_seen = true,
                _ => self.report(Diagnostic::MissingContext {
                    action: "begin-switch-case",
                    expected: NodeKind::Switch,
                    payload: "default".into(),
                }),
            },
        }
    }

    /// Finishes the switch block on top. Before any default marker it becomes
    /// the body of the open case, which then joins the switch's case list;
    /// afterwards it becomes the switch's default branch.
    pub fn end_switch_case(&mut self) {
        let default_seen = match self.tracer.find_last(is_switch) {
            Some(Node::Switch(switch)) => switch.default_seen,
            _ => {
                self.report(Diagnostic::MissingContext {
                    action: "end-switch-case",
                    expected: NodeKind::Switch,
                    payload: "case body".into(),
                });
                return;
            }
        };
        if !matches!(self.tracer.current(), Some(Node::Block(_))) {
            self.unexpected_top("end-switch-case", NodeKind::Block);
            return;
        }

        if default_seen {
            let has_default = matches!(
                self.tracer.find_last(is_switch),
                Some(Node::Switch(Switch { default: Some(_), .. }))
            );
            if has_default {
                self.report(Diagnostic::CannotAttach {
                    parent: Some(NodeKind::Switch),
                    child: NodeKind::Block,
                });
                return;
            }
            let Some(Node::Block(block)) = self.tracer.pop() else {
                return;
            };
            if let Some(Node::Switch(switch)) = self.tracer.find_last_mut(is_switch) {
                switch.default = Some(block);
            }
            return;
        }

        let nested = matches!(self.tracer.peek_nth(1), Some(Node::SwitchCase(_)))
            && matches!(self.tracer.peek_nth(2), Some(Node::Switch(_)));
        if !nested {
            let found = self.tracer.peek_nth(1).map(Node::kind);
            self.report(Diagnostic::UnexpectedTop {
                action: "end-switch-case",
                expected: NodeKind::SwitchCase,
                found,
            });
            return;
        }
        let (Some(Node::Block(block)), Some(Node::SwitchCase(mut case))) =
            (self.tracer.pop(), self.tracer.pop())
        else {
            return;
        };
        case.body = Some(block);
        if let Some(Node::Switch(switch)) = self.tracer.current_mut() {
            switch.cases.push(case);
        }
    }

    /// Pops the completed node on top and stores it in the next free field of
    /// its parent that accepts it, in completion order.
    pub fn attach(&mut self) {
        let Some(child) = self.tracer.pop() else {
            self.report(Diagnostic::NothingOpen("attach"));
            return;
        };
        let child_kind = child.kind();
        let rejected = match self.tracer.current_mut() {
            Some(parent) => place(parent, child).err(),
            None => Some(child),
        };
        if let Some(child) = rejected {
            self.tracer.push(child);
            let parent = self.tracer.peek_nth(1).map(Node::kind);
            self.report(Diagnostic::CannotAttach {
                parent,
                child: child_kind,
            });
        }
    }

    pub fn waypoint(&mut self) {
        self.tracer.waypoint();
    }

    /// Pops every node opened since the latest waypoint, in opening order.
    pub fn rewind(&mut self) -> Result<Vec<Node>> {
        self.ensure_alive()?;
        self.tracer.rewind().map_err(|e| {
            self.aborted = true;
            e.into()
        })
    }

    /// Puts nodes taken by [`Builder::rewind`] back on top, in the given
    /// order, so a later [`Builder::attach`] can place them under a new
    /// parent.
    pub fn reattach(&mut self, nodes: Vec<Node>) {
        for node in nodes {
            log::trace!("reattach {} {}", node.kind(), node.id());
            self.tracer.push(node);
        }
    }

    pub fn finish(mut self) -> Result<Build> {
        self.ensure_alive()?;
        match self.tracer.depth() {
            0 => Err(BuildError::Empty),
            1 => match self.tracer.pop() {
                Some(Node::Program(program)) => {
                    log::debug!(
                        "built program with {} functions, {} nodes created",
                        program.functions.len(),
                        self.session.created()
                    );
                    Ok(Build {
                        program,
                        diagnostics: self.diagnostics,
                    })
                }
                Some(other) => Err(BuildError::NotAProgram(other.kind())),
                None => Err(BuildError::Empty),
            },
            open => Err(BuildError::Unfinished { open }),
        }
    }
}

/// Stores `child` in the first free field of `parent` accepting it, or hands
/// it back untouched.
fn place(parent: &mut Node, child: Node) -> std::result::Result<(), Node> {
    match (parent, child) {
        (Node::Program(p), Node::Function(f)) => p.functions.push(f),
        (Node::Function(f), Node::Block(b)) if f.body.is_none() => f.body = Some(b),
        (Node::Assignment(a), Node::Expression(e)) if a.value.is_none() => a.value = Some(e),
        (Node::Return(r), Node::Expression(e)) if r.value.is_none() => r.value = Some(e),
        (Node::Call(c), Node::Expression(e)) => c.args.push(e),
        (Node::Conditional(c), Node::Expression(e)) if c.condition.is_none() => {
            c.condition = Some(e);
        }
        (Node::Conditional(c), Node::Block(b)) if c.then.is_none() => c.then = Some(b),
        (Node::Conditional(c), Node::Block(b)) if c.els.is_none() => c.els = Some(b),
        (Node::Loop(l), Node::Expression(e)) if l.from.is_none() => l.from = Some(e),
        (Node::Loop(l), Node::Expression(e)) if l.to.is_none() => l.to = Some(e),
        (Node::Loop(l), Node::Expression(e)) if l.step.is_none() => l.step = Some(e),
        (Node::Loop(l), Node::Block(b)) if l.body.is_none() => l.body = Some(b),
        (Node::Switch(s), Node::Expression(e)) if s.scrutinee.is_none() => s.scrutinee = Some(e),
        (Node::Block(b), child) => b.statements.push(child.into_statement()?),
        (_, child) => return Err(child),
    }
    Ok(())
}
