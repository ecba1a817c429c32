//! Command line definition

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "inlove-desk")]
#[command(author, version, about = "In Love store desk: product labels, QR scanning and stock")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Catalog JSON file (overrides CATALOG_PATH)
    #[arg(long, short = 'c', global = true)]
    pub catalog: Option<String>,

    /// Log level (overrides LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Label output kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LabelKind {
    /// Label document at physical size
    #[default]
    Svg,
    /// Printer-ready bytes
    Escpos,
    /// QR image only, for download
    Png,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a scanned payload to a catalog item
    Resolve {
        /// Decoded QR text, id, short code or any fragment of them
        payload: String,
    },

    /// Render a product label to a file
    Label {
        /// Short code or id of the item
        code: String,

        /// Output kind
        #[arg(long, short = 'f', value_enum, default_value = "svg")]
        format: LabelKind,

        /// Output path (defaults to a name derived from the short code)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Label preset, standard or wide (overrides LABEL_PRESET)
        #[arg(long)]
        preset: Option<String>,

        /// Open a temporary preview instead of writing a file
        #[arg(long)]
        preview: bool,
    },

    /// Print product labels
    Print {
        /// Short code or id of the item
        code: String,

        /// Number of copies
        #[arg(long, short = 'n', default_value = "1")]
        copies: u32,

        /// Network printer, host[:port] (overrides PRINTER_ADDR)
        #[arg(long)]
        addr: Option<String>,

        /// Printer device file, e.g. /dev/usb/lp0
        #[arg(long, conflicts_with = "addr")]
        device: Option<PathBuf>,

        /// Label preset, standard or wide (overrides LABEL_PRESET)
        #[arg(long)]
        preset: Option<String>,
    },

    /// Scan QR codes from image files or a watched folder
    Scan {
        /// Image files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Keep watching a single directory for new snapshots
        #[arg(long)]
        watch: bool,

        /// Keep scanning after a match
        #[arg(long)]
        continuous: bool,
    },

    /// List items at or below their minimum stock
    Stock,
}
