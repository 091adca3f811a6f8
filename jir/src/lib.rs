//! Crate for reading, rewriting and writing the textual form of java class files, as produced by the
//! [Krakatau](https://github.com/Storyyeller/Krakatau) disassembler in `-roundtrip` mode.
//!
//! The format is read into a [`Document`][tree::Document] with [`reader::read`]. Every line not
//! touched by a rewrite is written back byte for byte by [`writer::write_string`], so the result can be
//! fed to the assembler again.
//!
//! The main operation of this crate is [`patch`]: find a method by the `Utf8` constant holding its name,
//! and replace the field read at its start with an instruction pushing a constant.
//!
//! ```
//! # use pretty_assertions::assert_eq;
//! use jir::tree::code::Instruction;
//! let input = "\
//! .method public [1] : [2] \n\
//!     .attribute [3] .code stack 1 locals 1 \n\
//! L0:     aload_0 \n\
//! L1:     getfield [4] \n\
//! L4:     ireturn \n\
//!     .end code \n\
//! .end method \n\
//! .const [1] = Utf8 isPremiumAccount \n\
//! .const [2] = Utf8 ()Z \n\
//! ";
//!
//! let document = jir::reader::read(input).unwrap();
//! let patched = jir::patch(&document, "isPremiumAccount", &Instruction::new("iconst_1")).unwrap();
//!
//! assert_eq!(jir::writer::write_string(&patched), "\
//! .method public [1] : [2] \n\
//!     .attribute [3] .code stack 1 locals 1 \n\
//! L0:     iconst_1 \n\
//! L4:     ireturn \n\
//!     .end code \n\
//! .end method \n\
//! .const [1] = Utf8 isPremiumAccount \n\
//! .const [2] = Utf8 ()Z \n\
//! ");
//! ```

mod lines;

pub mod error;
pub mod tree;
pub mod reader;
pub mod writer;

mod action;
mod patch;

pub use action::MatchPolicy;
pub use action::rewrite::EXPECTED_PREFIX;
pub use error::{ParseError, ParseErrorKind, PatchError};
pub use patch::{patch, Patch};
