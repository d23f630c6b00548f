use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use procsnap::{ProcFs, ProcessId, ProcfsConfig, SystemSnapshot, VanishedPolicy};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(
    name = "procsnap",
    about = "Typed point-in-time snapshots of Linux /proc records",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON config file with `root` and `vanished`
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Alternative proc root, overrides the config file
    #[arg(long)]
    root: Option<PathBuf>,

    /// Fail when a process exits while it is being listed
    #[arg(long)]
    strict: bool,

    /// Print records as stat lines instead of JSON
    #[arg(long)]
    raw: bool,
}

/// 要执行的命令
#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// System-wide snapshot
    System,
    /// Every process record
    Processes,
    /// A single process record
    Pid {
        #[arg(value_parser = parse_pid)]
        pid: ProcessId,
    },
}

fn parse_pid(value: &str) -> Result<ProcessId, String> {
    value
        .parse::<i32>()
        .ok()
        .and_then(ProcessId::new)
        .ok_or_else(|| format!("invalid process id {:?}", value))
}

impl Cli {
    /// 合并配置文件与命令行参数，命令行优先
    fn config(&self) -> Result<ProcfsConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
            None => ProcfsConfig::default(),
        };
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if self.strict {
            config.vanished = VanishedPolicy::Fail;
        }
        Ok(config)
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let fs = ProcFs::new(Some(cli.config()?));
    procsnap::init(&fs)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::System => {
            serde_json::to_writer_pretty(&mut out, &SystemSnapshot::collect(&fs)?)?;
        }
        Command::Processes => {
            let records = fs.process_records()?;
            if cli.raw {
                for record in &records {
                    writeln!(out, "{}", record)?;
                }
                return Ok(());
            }
            serde_json::to_writer_pretty(&mut out, &records)?;
        }
        Command::Pid { pid } => {
            let record = fs.process_record(pid)?;
            if cli.raw {
                writeln!(out, "{}", record)?;
                return Ok(());
            }
            serde_json::to_writer_pretty(&mut out, &record)?;
        }
    }
    writeln!(out)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("procsnap: {}", e);
            ExitCode::FAILURE
        }
    }
}
