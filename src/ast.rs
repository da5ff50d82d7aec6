mod expression;
mod label;


pub use expression::*;
pub use label::Label;

use std::fmt;

pub type Name = String;

/// Identity of a node inside one compilation session.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owner of the node id counter. Every node constructor draws from it, so
/// ids are unique and increasing for the lifetime of the session.
#[derive(Debug, Default)]
pub struct Session {
    counter: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.counter);
        self.counter += 1;
        id
    }

    pub fn created(&self) -> u64 {
        self.counter
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum NodeKind {
    Program,
    Function,
    Block,
    Assignment,
    Return,
    Break,
    LoopExit,
    Loop,
    Conditional,
    Switch,
    SwitchCase,
    Expression,
    Identifier,
    Call,
    Constant,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Program => "Program",
            Self::Function => "Function",
            Self::Block => "Block",
            Self::Assignment => "Assignment",
            Self::Return => "Return",
            Self::Break => "Break",
            Self::LoopExit => "LoopExit",
            Self::Loop => "Loop",
            Self::Conditional => "Conditional",
            Self::Switch => "Switch",
            Self::SwitchCase => "SwitchCase",
            Self::Expression => "Expression",
            Self::Identifier => "Identifier",
            Self::Call => "Call",
            Self::Constant => "Constant",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub id: NodeId,
    pub literal: String,
}

impl Constant {
    pub fn new(session: &mut Session, literal: impl Into<String>) -> Self {
        Self {
            id: session.next_id(),
            literal: literal.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub id: NodeId,
    pub name: Name,
}

impl Identifier {
    pub fn new(session: &mut Session, name: impl Into<Name>) -> Self {
        Self {
            id: session.next_id(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub id: NodeId,
    pub name: Name,
    pub args: Vec<Expression>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Builtin {
    Print,
    Read,
}

impl Call {
    pub fn new(session: &mut Session, name: impl Into<Name>) -> Self {
        Self {
            id: session.next_id(),
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// `print` and `read` (optionally wrapped in underscores) bypass the
    /// call convention.
    pub fn builtin(&self) -> Option<Builtin> {
        match self.name.trim_matches('_') {
            "print" => Some(Builtin::Print),
            "read" => Some(Builtin::Read),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub id: NodeId,
    pub target: Name,
    pub value: Option<Expression>,
}

impl Assignment {
    pub fn new(session: &mut Session) -> Self {
        Self {
            id: session.next_id(),
            target: Name::new(),
            value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: NodeId,
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(session: &mut Session) -> Self {
        Self {
            id: session.next_id(),
            statements: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub id: NodeId,
    pub condition: Option<Expression>,
    pub then: Option<Block>,
    pub els: Option<Block>,
}

impl Conditional {
    pub fn new(session: &mut Session) -> Self {
        Self {
            id: session.next_id(),
            condition: None,
            then: None,
            els: None,
        }
    }

    pub fn else_label(&self) -> Label {
        Label::new("Else", NodeKind::Conditional, Some(self.id))
    }

    pub fn exit_label(&self) -> Label {
        Label::new("Exit", NodeKind::Conditional, Some(self.id))
    }
}

/// Ascending loop over `var` from `from` to `to` inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub id: NodeId,
    pub var: Name,
    pub from: Option<Expression>,
    pub to: Option<Expression>,
    pub step: Option<Expression>,
    pub body: Option<Block>,
}

impl Loop {
    pub fn new(session: &mut Session) -> Self {
        Self {
            id: session.next_id(),
            var: Name::new(),
            from: None,
            to: None,
            step: None,
            body: None,
        }
    }

    pub fn condition_label(&self) -> Label {
        Label::new("Condition", NodeKind::Loop, Some(self.id))
    }

    pub fn exit_label(&self) -> Label {
        exit_label(NodeKind::Loop, Some(self.id))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Switch {
    pub id: NodeId,
    pub scrutinee: Option<Expression>,
    pub cases: Vec<SwitchCase>,
    pub default: Option<Block>,
    /// Set once a default marker was seen; finished switch blocks then
    /// become `default` instead of a case body.
    pub default_seen: bool,
}

impl Switch {
    pub fn new(session: &mut Session) -> Self {
        Self {
            id: session.next_id(),
            scrutinee: None,
            cases: Vec::new(),
            default: None,
            default_seen: false,
        }
    }

    pub fn exit_label(&self) -> Label {
        exit_label(NodeKind::Switch, Some(self.id))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub id: NodeId,
    pub values: Vec<Expression>,
    pub body: Option<Block>,
}

impl SwitchCase {
    pub fn new(session: &mut Session, value: Expression) -> Self {
        Self {
            id: session.next_id(),
            values: vec![value],
            body: None,
        }
    }

    pub fn skip_label(&self) -> Label {
        Label::new("Skip", NodeKind::SwitchCase, Some(self.id))
    }
}

/// Jump out of the switch that was innermost when the break was created.
#[derive(Debug, Clone, PartialEq)]
pub struct Break {
    pub id: NodeId,
    pub target: Option<NodeId>,
}

impl Break {
    pub fn new(session: &mut Session, target: Option<NodeId>) -> Self {
        Self {
            id: session.next_id(),
            target,
        }
    }

    pub fn target_label(&self) -> Label {
        exit_label(NodeKind::Switch, self.target)
    }
}

/// Jump out of the loop that was innermost when the exit was created.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopExit {
    pub id: NodeId,
    pub target: Option<NodeId>,
}

impl LoopExit {
    pub fn new(session: &mut Session, target: Option<NodeId>) -> Self {
        Self {
            id: session.next_id(),
            target,
        }
    }

    pub fn target_label(&self) -> Label {
        exit_label(NodeKind::Loop, self.target)
    }
}

fn exit_label(kind: NodeKind, id: Option<NodeId>) -> Label {
    Label::new("Exit", kind, id)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub id: NodeId,
    pub value: Option<Expression>,
}

impl Return {
    pub fn new(session: &mut Session) -> Self {
        Self {
            id: session.next_id(),
            value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub id: NodeId,
    pub name: Name,
    pub params: Vec<Name>,
    pub body: Option<Block>,
}

impl FunctionDeclaration {
    pub fn new(session: &mut Session) -> Self {
        Self {
            id: session.next_id(),
            name: Name::new(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn label(&self) -> Label {
        Label::function(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub id: NodeId,
    pub functions: Vec<FunctionDeclaration>,
}

impl Program {
    pub fn new(session: &mut Session) -> Self {
        Self {
            id: session.next_id(),
            functions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assignment(Assignment),
    Block(Block),
    Conditional(Conditional),
    Loop(Loop),
    Switch(Switch),
    Break(Break),
    LoopExit(LoopExit),
    Return(Return),
    Call(Call),
}

impl Statement {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Assignment(_) => NodeKind::Assignment,
            Self::Block(_) => NodeKind::Block,
            Self::Conditional(_) => NodeKind::Conditional,
            Self::Loop(_) => NodeKind::Loop,
            Self::Switch(_) => NodeKind::Switch,
            Self::Break(_) => NodeKind::Break,
            Self::LoopExit(_) => NodeKind::LoopExit,
            Self::Return(_) => NodeKind::Return,
            Self::Call(_) => NodeKind::Call,
        }
    }
}

/// Any node that can be open on the builder's tracer.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Program(Program),
    Function(FunctionDeclaration),
    Block(Block),
    Assignment(Assignment),
    Return(Return),
    Break(Break),
    LoopExit(LoopExit),
    Loop(Loop),
    Conditional(Conditional),
    Switch(Switch),
    SwitchCase(SwitchCase),
    Expression(Expression),
    Identifier(Identifier),
    Call(Call),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Program(_) => NodeKind::Program,
            Self::Function(_) => NodeKind::Function,
            Self::Block(_) => NodeKind::Block,
            Self::Assignment(_) => NodeKind::Assignment,
            Self::Return(_) => NodeKind::Return,
            Self::Break(_) => NodeKind::Break,
            Self::LoopExit(_) => NodeKind::LoopExit,
            Self::Loop(_) => NodeKind::Loop,
            Self::Conditional(_) => NodeKind::Conditional,
            Self::Switch(_) => NodeKind::Switch,
            Self::SwitchCase(_) => NodeKind::SwitchCase,
            Self::Expression(_) => NodeKind::Expression,
            Self::Identifier(_) => NodeKind::Identifier,
            Self::Call(_) => NodeKind::Call,
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            Self::Program(n) => n.id,
            Self::Function(n) => n.id,
            Self::Block(n) => n.id,
            Self::Assignment(n) => n.id,
            Self::Return(n) => n.id,
            Self::Break(n) => n.id,
            Self::LoopExit(n) => n.id,
            Self::Loop(n) => n.id,
            Self::Conditional(n) => n.id,
            Self::Switch(n) => n.id,
            Self::SwitchCase(n) => n.id,
            Self::Expression(n) => n.id,
            Self::Identifier(n) => n.id,
            Self::Call(n) => n.id,
        }
    }

    pub fn into_statement(self) -> Result<Statement, Node> {
        match self {
            Self::Assignment(n) => Ok(Statement::Assignment(n)),
            Self::Block(n) => Ok(Statement::Block(n)),
            Self::Conditional(n) => Ok(Statement::Conditional(n)),
            Self::Loop(n) => Ok(Statement::Loop(n)),
            Self::Switch(n) => Ok(Statement::Switch(n)),
            Self::Break(n) => Ok(Statement::Break(n)),
            Self::LoopExit(n) => Ok(Statement::LoopExit(n)),
            Self::Return(n) => Ok(Statement::Return(n)),
            Self::Call(n) => Ok(Statement::Call(n)),
            other => Err(other),
        }
    }
}
