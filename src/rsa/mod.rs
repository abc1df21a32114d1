use std::error::Error;
use std::fs::{self, File};
use std::io::{self, Read, Write};

use clap::{Parser, Subcommand};

pub mod cipher;
pub mod keys;
pub mod math;

use keys::RsaKey;

#[derive(Debug, Parser)]
#[clap(name = "rsenc", version, about = "Simple RSA key-dump parse / format / encrypt tool")]
pub struct Rsenc {
    #[clap(subcommand)]
    pub command: Command,
    #[clap(short, long, global = true, help = "Disable log output")]
    pub silent: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a key dump and print its fields
    Parse {
        #[clap(value_parser, help = "Key dump file")]
        key: String,
    },
    /// Emit the modulus and public exponent as a source literal fragment
    Format {
        #[clap(value_parser, help = "Key dump file")]
        key: String,
        #[clap(value_parser, help = "Output filename, or `stdout'")]
        output: String,
    },
    /// Encrypt a plaintext file into fixed-width ciphertext blocks
    Encrypt {
        #[clap(value_parser, help = "Key dump file")]
        key: String,
        #[clap(value_parser, help = "Plaintext filename, or `stdin'")]
        input: String,
        #[clap(value_parser, help = "Ciphertext filename, or `stdout'")]
        output: String,
    },
}

impl Rsenc {
    fn reader(path: &str) -> io::Result<Box<dyn Read>> {
        Ok(match path {
            "stdin" => Box::new(io::stdin()),
            f => Box::new(File::open(f)?),
        })
    }

    fn writer(path: &str) -> io::Result<Box<dyn Write>> {
        Ok(match path {
            "stdout" => Box::new(io::stdout()),
            f => Box::new(File::create(f)?),
        })
    }

    fn load_key(path: &str) -> Result<RsaKey, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        Ok(keys::parse_key_dump(&text)?)
    }

    pub fn run(&self) -> Result<(), Box<dyn Error>> {
        match &self.command {
            Command::Parse { key } => {
                let key = Self::load_key(key)?;
                println!("modulus: {:x}", key.n);
                println!("publicExponent: {:x} ({})", key.e, key.e);
                println!("privateExponent: {:x}", key.d);
            }
            Command::Format { key, output } => {
                let key = Self::load_key(key)?;
                let mut writer = Self::writer(output)?;
                keys::write_source_literal(&mut writer, &key)?;
                writer.flush()?;
                if !self.silent && output != "stdout" {
                    println!("Wrote key literal to {}", output);
                }
            }
            Command::Encrypt { key, input, output } => {
                let key = Self::load_key(key)?;
                let mut reader = Self::reader(input)?;
                let mut writer = Self::writer(output)?;
                // Never mix diagnostics into ciphertext on stdout.
                let silent = self.silent || output == "stdout";
                cipher::encrypt_stream(&mut reader, &mut writer, &key, silent)?;
                if !silent {
                    println!("Done");
                }
            }
        }
        Ok(())
    }
}
