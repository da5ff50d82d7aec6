use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Print the RPN listing
    #[arg(long)]
    pub rpn: bool,

    /// Print the assembly listing
    #[arg(long)]
    pub asm: bool,

    /// Write the assembly to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Execute the generated assembly
    #[cfg(feature = "vm")]
    #[arg(long)]
    pub run: bool,

    /// Execute an existing assembly file instead of replaying a script
    #[cfg(feature = "vm")]
    #[arg(long, value_name = "FILE", conflicts_with = "script")]
    pub exec: Option<PathBuf>,

    /// Builder action script
    pub script: Option<PathBuf>,
}

impl Args {
    /// Both listings go to stdout when nothing else was asked for.
    pub fn print_both(&self) -> bool {
        !self.rpn && !self.asm && !self.running()
    }

    #[cfg(feature = "vm")]
    pub fn running(&self) -> bool {
        self.run
    }

    #[cfg(not(feature = "vm"))]
    pub fn running(&self) -> bool {
        false
    }
}
