//! Build Descriptor Tooling
//!
//! This is the entry-point of `build-descriptor`, a command-line tool to
//! resolve the Android build configuration of an application. Its inputs are
//! the `build-descriptor.toml` manifest and, optionally, a properties file
//! with the platform context (usually Flutter's `local.properties`).
//!
//! This CLI is mainly a dispatcher of the operations available in
//! `build_descriptor::op::*`. It is a simple clap-based CLI that forwards the
//! arguments to `build_descriptor` and visualizes the results.

use build_descriptor::context::PlatformContext;
use build_descriptor::manifest::Manifest;
use build_descriptor::render;

struct Cli {
    cmd: clap::Command,
}

fn arg_format(
    s: &str,
) -> Result<render::Format, clap::error::Error> {
    s.parse().map_err(
        |_| {
            clap::error::Error::raw(
                clap::error::ErrorKind::ValueValidation,
                "Invalid output format, expected 'json', 'properties', or 'kts'\n",
            )
        }
    )
}

fn arg_platform() -> clap::Arg {
    clap::Arg::new("platform")
        .long("platform")
        .value_name("ID")
        .help("ID of the platform entry in the manifest")
        .default_value("android")
}

fn arg_variant() -> clap::Arg {
    clap::Arg::new("variant")
        .long("variant")
        .value_name("NAME")
        .help("Build variant to resolve (default configuration if omitted)")
}

impl Cli {
    fn new() -> Self {
        let mut cmd;

        cmd = clap::Command::new("build-descriptor")
            .propagate_version(true)
            .subcommand_required(true)
            .about("Android Build Descriptor Resolver")
            .long_about("Resolve the Android build configuration of an application")
            .version(clap::crate_version!());

        cmd = cmd.arg(
            clap::Arg::new("manifest")
                .long("manifest")
                .value_name("PATH")
                .help("Path to the manifest relative to the working directory")
                .default_value("./build-descriptor.toml")
                .value_parser(clap::builder::ValueParser::path_buf())
        );

        cmd = cmd.arg(
            clap::Arg::new("context")
                .long("context")
                .value_name("PATH")
                .help("Properties file with the platform context (framework defaults if omitted)")
                .value_parser(clap::builder::ValueParser::path_buf())
        );

        cmd = cmd.subcommand(
            clap::Command::new("resolve")
                .about("Resolve and print a build descriptor")
                .arg(arg_platform())
                .arg(arg_variant())
                .arg(
                    clap::Arg::new("format")
                        .long("format")
                        .value_name("FORMAT")
                        .help("Output format: json, properties, or kts")
                        .default_value("json")
                        .value_parser(arg_format)
                )
        );

        cmd = cmd.subcommand(
            clap::Command::new("emerge")
                .about("Write the resolved build script to the platform directory")
                .arg(arg_platform())
                .arg(arg_variant())
                .arg(
                    clap::Arg::new("update")
                        .long("update")
                        .value_name("BOOL")
                        .help("Whether to allow updating an existing platform directory")
                        .default_value("false")
                        .value_parser(clap::builder::ValueParser::bool())
                )
        );

        Self {
            cmd: cmd,
        }
    }

    fn manifest(
        &self,
        m: &clap::ArgMatches,
    ) -> Result<Manifest, u8> {
        let path = m.get_one::<std::path::PathBuf>("manifest")
            .ok_or(2u8)?;

        Manifest::parse_path(path).map_err(|e| {
            eprintln!("Cannot parse manifest {:?}: {}", path, e);
            1
        })
    }

    fn context(
        &self,
        m: &clap::ArgMatches,
    ) -> Result<PlatformContext, u8> {
        match m.get_one::<std::path::PathBuf>("context") {
            None => {
                tracing::debug!("no platform context given, using framework defaults");
                Ok(PlatformContext::flutter_defaults())
            },
            Some(path) => PlatformContext::from_path(path).map_err(|e| {
                eprintln!("Cannot load platform context: {}", e);
                1
            }),
        }
    }

    fn op_resolve(
        &self,
        m: &clap::ArgMatches,
        m_op: &clap::ArgMatches,
    ) -> Result<(), u8> {
        let manifest = self.manifest(m)?;
        let context = self.context(m)?;
        let platform = m_op.get_one::<String>("platform").ok_or(2u8)?;
        let variant = m_op.get_one::<String>("variant").map(|v| v.as_str());
        let format = *m_op.get_one::<render::Format>("format").ok_or(2u8)?;

        let resolution = build_descriptor::op::resolve::resolve(
            &manifest,
            platform,
            &context,
            variant,
        ).map_err(|e| {
            eprintln!("Cannot resolve build descriptor: {}", e);
            1u8
        })?;

        let out = render::render(format, &resolution.descriptor, &resolution.dependencies)
            .map_err(|e| {
                eprintln!("Cannot render build descriptor: {}", e);
                1u8
            })?;
        print!("{}", out);

        Ok(())
    }

    fn op_emerge(
        &self,
        m: &clap::ArgMatches,
        m_op: &clap::ArgMatches,
    ) -> Result<(), u8> {
        let manifest = self.manifest(m)?;
        let context = self.context(m)?;
        let platform = m_op.get_one::<String>("platform").ok_or(2u8)?;
        let variant = m_op.get_one::<String>("variant").map(|v| v.as_str());
        let update = *m_op.get_one::<bool>("update").ok_or(2u8)?;

        match build_descriptor::op::emerge::emerge(
            &manifest,
            platform,
            &context,
            variant,
            None,
            update,
        ) {
            Err(build_descriptor::op::emerge::Error::Already) => {
                eprintln!("Cannot emerge build script: Platform directory already present");
                Err(1)
            },
            Err(e) => {
                eprintln!("Cannot emerge build script: {}", e);
                Err(1)
            },
            Ok(_) => {
                Ok(())
            },
        }
    }

    fn run(mut self) -> Result<(), u8> {
        let (m, r);

        r = self.cmd.try_get_matches_from_mut(
            std::env::args_os(),
        );

        match r {
            Ok(v) => m = v,
            Err(e) => {
                return match e.kind() {
                    clap::error::ErrorKind::DisplayHelp |
                    clap::error::ErrorKind::DisplayVersion => {
                        let _ = e.print();
                        Ok(())
                    },
                    _ => {
                        let _ = e.print();
                        Err(2)
                    }
                }
            }
        }

        match m.subcommand() {
            Some(("resolve", m_op)) => self.op_resolve(&m, m_op),
            Some(("emerge", m_op)) => self.op_emerge(&m, m_op),
            _ => std::unreachable!(),
        }
    }
}

fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match Cli::new().run() {
        Ok(()) => 0.into(),
        Err(v) => v.into(),
    }
}
