//! Command line option table and argument parser.
//!
//! Options use the single-dash long spelling of the original tool
//! (`-namespaceMapping`, `-use-local-files-only`), so parsing is driven by a
//! static table rather than by clap's GNU-style grammar. The parser makes one
//! left-to-right pass with one token of lookahead for value-bearing options.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use thiserror::Error;

pub const DESCRIPTION: &str = "KDAB's WSDL to C++ compiler";

/// Version shown by `-v`/`-version`.
pub const VERSION: &str = "2.1";

/// Usage errors. All of them print the usage text and exit with status 1.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("Option {0} requires a value")]
    MissingValue(String),

    #[error("Unknown option: {0}")]
    UnrecognizedOption(String),

    #[error("Only one WSDL file may be given, unexpected argument: {0}")]
    ExtraDocument(String),

    #[error("Argument is not valid Unicode: {0}")]
    NonUnicodeArgument(String),

    #[error("No WSDL file given")]
    MissingDocument,

    #[error("-both cannot be combined with -o or -impl")]
    ConflictingModes,
}

/// Flags that take no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    Server,
    KeepUnusedTypes,
    UseLocalFilesOnly,
    HelpOnMissing,
    NoSync,
    NoAsync,
    NoAsyncJobs,
    Verbose,
    NoColor,
}

/// Options that consume the following token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    Output,
    Implementation,
    Both,
    Service,
    ExportMacro,
    Namespace,
    NamespaceMapping,
    OptionalElementType,
    ImportPath,
    Pkcs12File,
    Pkcs12Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Help,
    Version,
    Switch(Switch),
    Setting(Setting),
}

/// One entry of the option table.
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub names: &'static [&'static str],
    pub kind: OptionKind,
}

impl OptionSpec {
    const fn new(names: &'static [&'static str], kind: OptionKind) -> Self {
        Self { names, kind }
    }

    /// Number of tokens following the option that belong to it.
    pub fn arity(&self) -> usize {
        match self.kind {
            OptionKind::Setting(_) => 1,
            _ => 0,
        }
    }
}

pub const OPTIONS: &[OptionSpec] = &[
    OptionSpec::new(&["-h", "-help"], OptionKind::Help),
    OptionSpec::new(&["-v", "-version"], OptionKind::Version),
    OptionSpec::new(&["-o", "-output"], OptionKind::Setting(Setting::Output)),
    OptionSpec::new(&["-impl"], OptionKind::Setting(Setting::Implementation)),
    OptionSpec::new(&["-both"], OptionKind::Setting(Setting::Both)),
    OptionSpec::new(&["-server"], OptionKind::Switch(Switch::Server)),
    OptionSpec::new(&["-s", "-service"], OptionKind::Setting(Setting::Service)),
    OptionSpec::new(&["-exportMacro"], OptionKind::Setting(Setting::ExportMacro)),
    OptionSpec::new(&["-namespace"], OptionKind::Setting(Setting::Namespace)),
    OptionSpec::new(
        &["-namespaceMapping"],
        OptionKind::Setting(Setting::NamespaceMapping),
    ),
    OptionSpec::new(
        &["-optional-element-type"],
        OptionKind::Setting(Setting::OptionalElementType),
    ),
    OptionSpec::new(
        &["-keep-unused-types"],
        OptionKind::Switch(Switch::KeepUnusedTypes),
    ),
    OptionSpec::new(&["-import-path"], OptionKind::Setting(Setting::ImportPath)),
    OptionSpec::new(
        &["-use-local-files-only"],
        OptionKind::Switch(Switch::UseLocalFilesOnly),
    ),
    OptionSpec::new(&["-help-on-missing"], OptionKind::Switch(Switch::HelpOnMissing)),
    OptionSpec::new(&["-no-sync"], OptionKind::Switch(Switch::NoSync)),
    OptionSpec::new(&["-no-async"], OptionKind::Switch(Switch::NoAsync)),
    OptionSpec::new(&["-no-async-jobs"], OptionKind::Switch(Switch::NoAsyncJobs)),
    OptionSpec::new(&["-verbose"], OptionKind::Switch(Switch::Verbose)),
    OptionSpec::new(&["-no-color"], OptionKind::Switch(Switch::NoColor)),
];

/// Options recognized only when built with client certificate support.
#[cfg(feature = "tls")]
pub const TLS_OPTIONS: &[OptionSpec] = &[
    OptionSpec::new(&["-pkcs12file"], OptionKind::Setting(Setting::Pkcs12File)),
    OptionSpec::new(
        &["-pkcs12password"],
        OptionKind::Setting(Setting::Pkcs12Password),
    ),
];

#[cfg(not(feature = "tls"))]
pub const TLS_OPTIONS: &[OptionSpec] = &[];

/// Looks up a token in the option table.
pub fn find_option(token: &str) -> Option<&'static OptionSpec> {
    OPTIONS
        .iter()
        .chain(TLS_OPTIONS)
        .find(|spec| spec.names.contains(&token))
}

/// Everything the command line said, before any validation across options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArguments {
    pub document: Option<String>,
    pub output: Option<PathBuf>,
    pub implementation_header: Option<String>,
    pub both_base: Option<PathBuf>,
    pub service: Option<String>,
    pub export_macro: Option<String>,
    pub namespace: Option<String>,
    /// Raw `-namespaceMapping` values in command line order.
    pub namespace_mappings: Vec<String>,
    pub optional_element_type: Option<String>,
    pub import_paths: Vec<PathBuf>,
    pub pkcs12_file: Option<PathBuf>,
    pub pkcs12_password: Option<String>,
    pub server: bool,
    pub keep_unused_types: bool,
    pub use_local_files_only: bool,
    pub help_on_missing: bool,
    pub skip_sync: bool,
    pub skip_async: bool,
    pub skip_async_jobs: bool,
    pub verbose: bool,
    pub no_color: bool,
}

impl RawArguments {
    fn set_switch(&mut self, switch: Switch) {
        match switch {
            Switch::Server => self.server = true,
            Switch::KeepUnusedTypes => self.keep_unused_types = true,
            Switch::UseLocalFilesOnly => self.use_local_files_only = true,
            Switch::HelpOnMissing => self.help_on_missing = true,
            Switch::NoSync => self.skip_sync = true,
            Switch::NoAsync => self.skip_async = true,
            Switch::NoAsyncJobs => self.skip_async_jobs = true,
            Switch::Verbose => self.verbose = true,
            Switch::NoColor => self.no_color = true,
        }
    }

    fn set_value(&mut self, setting: Setting, value: String) {
        match setting {
            Setting::Output => self.output = Some(PathBuf::from(value)),
            Setting::Implementation => self.implementation_header = Some(value),
            Setting::Both => self.both_base = Some(PathBuf::from(value)),
            Setting::Service => self.service = Some(value),
            Setting::ExportMacro => self.export_macro = Some(value),
            Setting::Namespace => self.namespace = Some(value),
            Setting::NamespaceMapping => self.namespace_mappings.push(value),
            Setting::OptionalElementType => self.optional_element_type = Some(value),
            Setting::ImportPath => self.import_paths.push(PathBuf::from(value)),
            Setting::Pkcs12File => self.pkcs12_file = Some(PathBuf::from(value)),
            Setting::Pkcs12Password => self.pkcs12_password = Some(value),
        }
    }
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Help,
    Version,
    Run(RawArguments),
}

fn is_flag_like(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

fn non_unicode(token: &OsStr) -> UsageError {
    UsageError::NonUnicodeArgument(token.to_string_lossy().into_owned())
}

/// Parses the command line tokens, program name excluded.
///
/// `-h` and `-v` end parsing as soon as they are seen. Unknown options, a
/// second document and tokens that are not valid Unicode are reported after
/// the whole line has been read, so a help request anywhere on the line takes
/// precedence over them.
pub fn parse_args<I, S>(args: I) -> Result<Invocation, UsageError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut tokens = args.into_iter().map(Into::into);
    let mut raw = RawArguments::default();
    let mut deferred: Option<UsageError> = None;

    while let Some(token) = tokens.next() {
        let token = match token.into_string() {
            Ok(token) => token,
            Err(token) => {
                deferred.get_or_insert(non_unicode(&token));
                continue;
            }
        };

        match find_option(&token).map(|spec| spec.kind) {
            Some(OptionKind::Help) => return Ok(Invocation::Help),
            Some(OptionKind::Version) => return Ok(Invocation::Version),
            Some(OptionKind::Switch(switch)) => raw.set_switch(switch),
            Some(OptionKind::Setting(setting)) => {
                let Some(value) = tokens.next() else {
                    return Err(deferred.unwrap_or(UsageError::MissingValue(token)));
                };
                match value.into_string() {
                    Ok(value) => raw.set_value(setting, value),
                    Err(value) => {
                        deferred.get_or_insert(non_unicode(&value));
                    }
                }
            }
            None if is_flag_like(&token) => {
                deferred.get_or_insert(UsageError::UnrecognizedOption(token));
            }
            None if raw.document.is_none() => raw.document = Some(token),
            None => {
                deferred.get_or_insert(UsageError::ExtraDocument(token));
            }
        }
    }

    match deferred {
        Some(err) => Err(err),
        None => Ok(Invocation::Run(raw)),
    }
}

pub fn version_text() -> String {
    format!("{} {}", DESCRIPTION, VERSION)
}

/// Full usage text, shown for `-h` and after every usage error.
pub fn usage_text(program: &str) -> String {
    let mut text = format!(
        "{version}\n\
         Usage:\n   \
         Header file: {program} [options] -o <headerfile> <wsdlfile>\n   \
         Impl.  file: {program} [options] -o <cppfile> -impl <headerfile> <wsdlfile>\n   \
         Both files : {program} [options] -both <basefile> <wsdlfile>\n\
         \n\
         Options:\n",
        version = version_text(),
    );
    text.push_str(
        "  -h, -help                 display this help and exit\n\
         \x20 -v, -version              display version\n\
         \x20 -s, -service <name>       name of the service to generate\n\
         \x20 -o <file>                 output the generated file into <file>\n\
         \x20 -impl <headerfile>        generate the implementation (.cpp) file, and #include <headerfile>\n\
         \x20 -both <basefilename>      generate both the header (.h) and the implementation (.cpp) file\n\
         \x20 -server                   generate server-side base class, instead of client service\n\
         \x20 -exportMacro <macroname>  set the export declaration to use for generated classes\n\
         \x20 -namespace <ns>           put all generated classes into the given C++ namespace\n\
         \x20 -namespaceMapping <mapping>\n\
         \x20                           add the uri=code mapping\n\
         \x20                           if <mapping> begins with '@', read from file instead\n\
         \x20                           one entry per line\n\
         \x20                           (affects the generated class names)\n\
         \x20 -optional-element-type <type>\n\
         \x20                           use <type> as the getter return value for optional elements.\n\
         \x20                           <type> can be either raw-pointer, boost-optional or std-optional\n\
         \x20 -keep-unused-types        keep the wsdl unused types to the cpp generation step\n\
         \x20 -import-path <importpath> search for files first in this path before\n\
         \x20                           downloading them. may be specified multiple times.\n\
         \x20                           the file needs to be located at:\n\
         \x20                           <importpath>/<url-host>/<url-path>\n\
         \x20 -use-local-files-only     only use local files instead of downloading them\n\
         \x20                           automatically. this can be used to force the correct\n\
         \x20                           use of the import-path option\n\
         \x20 -help-on-missing          when groups or basic types could not be found, display\n\
         \x20                           available types (helps with wrong namespaces)\n",
    );
    if !TLS_OPTIONS.is_empty() {
        text.push_str(
            "  -pkcs12file <file>        load a client certificate from a PKCS12 file, for WSDL\n\
             \x20                           files served from locations requiring certificate\n\
             \x20                           based authentication\n\
             \x20 -pkcs12password <pw>      password for the certificate file, if required.\n\
             \x20                           other users of the machine may be able to see it\n\
             \x20                           in the process list\n",
        );
    }
    text.push_str(
        "  -no-sync                  do not generate synchronous API methods to the client code\n\
         \x20 -no-async                 do not generate asynchronous API methods to the client code\n\
         \x20 -no-async-jobs            do not generate asynchronous job API classes to the client code\n\
         \x20 -verbose                  enable verbose output for debugging\n\
         \x20 -no-color                 suppress colored diagnostics\n",
    );
    text
}
