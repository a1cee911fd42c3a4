// Copyright (c) 2026 MCU-Debug Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::debug;

use gdb_register_codec::debug::init_logging;
use gdb_register_codec::helper_requests::RegisterInfo;
use gdb_register_codec::request_handler::{run_session, Session};
use gdb_register_codec::{transport, ProfileKind};

#[derive(Parser, Debug)]
#[command(author, version, about = "Register dump codec for vendor gdb stubs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Target profile of the stub
    #[arg(short = 'p', long = "profile", value_enum, default_value = "cisco2600", global = true)]
    profile: ProfileKind,

    /// Enable debug output
    #[arg(short = 'd', long = "debug", default_value_t = false, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Expand a run-length encoded stub reply
    Decode {
        /// Encoded text; read from stdin when omitted
        payload: Option<String>,
    },
    /// Expand and parse a register dump reply
    Parse {
        /// Reply text; read from stdin when omitted
        reply: Option<String>,

        /// Print JSON instead of name = value lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the register catalog of the selected profile as JSON
    Catalog,
    /// Serve Content-Length framed JSON requests on stdin/stdout
    Serve {
        /// Session identifier reported in events
        #[arg(long, default_value = "local-session")]
        session_id: String,
    },
}

fn input_or_stdin(arg: Option<String>) -> Result<String> {
    match arg {
        Some(text) => Ok(text),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("reading stub reply from stdin")?;
            Ok(text.trim().to_string())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = init_logging(cli.debug)?;
    debug!("{:?}", cli);

    match cli.command {
        Commands::Decode { payload } => {
            let profile = cli.profile.create()?;
            let encoded = input_or_stdin(payload)?;
            let expanded = profile.decode_run_length(&encoded)?;
            println!("{}", expanded);
        }
        Commands::Parse { reply, json } => {
            let profile = cli.profile.create()?;
            let reply = input_or_stdin(reply)?;
            let values = profile.decode_register_reply(&reply)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else {
                for v in &values {
                    let tag = if v.is_pc {
                        " (pc)"
                    } else if v.is_sp {
                        " (sp)"
                    } else {
                        ""
                    };
                    println!("{} = {}{}", v.name, v.value, tag);
                }
            }
        }
        Commands::Catalog => {
            let profile = cli.profile.create()?;
            let catalog: Vec<RegisterInfo> = profile
                .register_layout()
                .catalog()
                .iter()
                .map(RegisterInfo::from)
                .collect();
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
        Commands::Serve { session_id } => {
            // The initialize request may still switch profiles.
            let mut session = Session::with_profile(session_id, cli.profile)?;
            let mut stdio = transport::stdio();
            run_session(&mut stdio, &mut session)?;
        }
    }
    Ok(())
}
