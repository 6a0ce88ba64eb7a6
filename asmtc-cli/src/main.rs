use clap::{Parser, Subcommand};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use asmtc_db::Database;
use asmtc_gen::{Generator, GeneratorOptions, combination, materialize};
use asmtc_isa::{Dialect, DialectSet, filter, mnemonic, operand};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const DEFAULT_XDAFILE: &str = "../x86/insns.xda";

#[derive(Parser)]
#[command(name = "asmtc", about = "Exhaustive NASM/GAS assembler test-case generator")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one test source file per instruction
    Generate {
        /// Instruction database
        #[arg(short = 'i', long, default_value = DEFAULT_XDAFILE)]
        xdafile: PathBuf,
        /// Output root; dialect subdirectories are created below it
        #[arg(short, long, default_value = asmtc_gen::DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,
        /// Dialect to generate (repeatable; default: all)
        #[arg(short, long = "dialect", value_name = "DIALECT")]
        dialects: Vec<Dialect>,
        /// Only generate these mnemonics (repeatable)
        #[arg(short, long = "mnemonic", value_name = "NAME")]
        mnemonics: Vec<String>,
        /// Materialise everything but write no files
        #[arg(long)]
        dry_run: bool,
        /// Write the generation report as YAML
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,
    },
    /// List database mnemonics with eligibility and family size
    Opcodes {
        #[arg(short = 'i', long, default_value = DEFAULT_XDAFILE)]
        xdafile: PathBuf,
    },
    /// List operand tokens used by the database and their renderings
    Operands {
        #[arg(short = 'i', long, default_value = DEFAULT_XDAFILE)]
        xdafile: PathBuf,
    },
    /// Print the instruction lines of one mnemonic without writing files
    Show {
        #[arg(short = 'i', long, default_value = DEFAULT_XDAFILE)]
        xdafile: PathBuf,
        /// Database mnemonic, e.g. ADD or CMOVcc
        mnemonic: String,
        /// Dialect to show (repeatable; default: all)
        #[arg(short, long = "dialect", value_name = "DIALECT")]
        dialects: Vec<Dialect>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            xdafile,
            output_dir,
            dialects,
            mnemonics,
            dry_run,
            report,
        } => {
            let options = GeneratorOptions {
                output_dir,
                dialects: dialect_set(&dialects),
                only: (!mnemonics.is_empty()).then(|| mnemonics.into_iter().collect()),
                dry_run,
            };
            cmd_generate(&xdafile, options, report.as_deref())
        }
        Commands::Opcodes { xdafile } => cmd_opcodes(&xdafile),
        Commands::Operands { xdafile } => cmd_operands(&xdafile),
        Commands::Show {
            xdafile,
            mnemonic,
            dialects,
        } => cmd_show(&xdafile, &mnemonic, dialect_set(&dialects)),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {e}");
    std::process::exit(1);
}

fn dialect_set(dialects: &[Dialect]) -> DialectSet {
    if dialects.is_empty() {
        DialectSet::all()
    } else {
        dialects.iter().copied().collect()
    }
}

fn open_db(path: &Path) -> Database {
    match Database::open(path) {
        Ok(db) => db,
        Err(e) => fail(e),
    }
}

fn cmd_generate(path: &Path, options: GeneratorOptions, report_path: Option<&Path>) {
    let db = open_db(path);
    let report = match Generator::new(&db, options).run() {
        Ok(r) => r,
        Err(e) => fail(e),
    };

    print!("{report}");

    if let Some(out) = report_path {
        let yaml = match report.to_yaml() {
            Ok(y) => y,
            Err(e) => fail(e),
        };
        if let Err(e) = fs::write(out, yaml) {
            fail(format_args!("{}: {e}", out.display()));
        }
    }
}

fn cmd_opcodes(path: &Path) {
    let db = open_db(path);
    let mnemonics = db.mnemonics();

    println!("# {} opcodes", mnemonics.len());
    for m in mnemonics {
        let status = match filter::reason(m) {
            Some(reason) => format!("skipped ({reason})"),
            None => "eligible".to_string(),
        };
        match mnemonic::family(m) {
            Some(members) => {
                let kept = members.iter().filter(|x| filter::is_eligible(x)).count();
                println!("{m:<16} {status:<20} family of {kept}/{}", members.len());
            }
            None => println!("{m:<16} {status}"),
        }
    }
}

fn cmd_operands(path: &Path) {
    let db = open_db(path);

    // token -> number of records using it
    let mut uses: BTreeMap<&str, usize> = BTreeMap::new();
    for rec in db.records() {
        for token in combination::split_signature(&rec.operands) {
            *uses.entry(token).or_default() += 1;
        }
    }

    println!("# {} operand tokens", uses.len());
    let mut missing = 0;
    for (token, count) in &uses {
        let absent: Vec<&str> = Dialect::ALL
            .iter()
            .filter(|d| operand::render(token, **d).is_none())
            .map(|d| d.name())
            .collect();
        if absent.is_empty() {
            let alternatives = operand::render(token, Dialect::Nasm).map_or(0, |r| r.len());
            println!("{token:<24} {count:>6} use(s)  {alternatives} alternative(s)");
        } else {
            missing += 1;
            println!("{token:<24} {count:>6} use(s)  no rendering for {}", absent.join(", "));
        }
    }
    if missing > 0 {
        println!("# {missing} token(s) cannot be rendered in every dialect");
    }
}

fn cmd_show(path: &Path, name: &str, dialects: DialectSet) {
    let db = open_db(path);
    let records: Vec<_> = db.records_for(name).collect();
    if records.is_empty() {
        fail(format_args!("'{name}' is not in {}", path.display()));
    }
    if let Some(reason) = filter::reason(name) {
        println!("# '{name}' is skipped by generate ({reason})");
    }

    let signatures: BTreeSet<&str> = records.iter().map(|r| r.operands.as_str()).collect();
    println!("# {} line(s), {} signature(s)", records.len(), signatures.len());

    for dialect in dialects.dialects() {
        println!("[{dialect}]");
        for rec in &records {
            match materialize(&rec.mnemonic, &rec.operands, &rec.line, dialect) {
                Ok(lines) => {
                    for line in lines {
                        println!("    {line}");
                    }
                }
                Err(e) => println!("    ; line {}: {e}", rec.line_no),
            }
        }
    }
}
