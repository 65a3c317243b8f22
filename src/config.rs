use std::path::{Path, PathBuf};

use crate::cli::{RawArguments, UsageError};
use crate::error::Wsdl2CppError;
use crate::namespace_mapping::{self, NamespaceMapping};

/// Which files a generation run writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    HeaderOnly,
    ImplementationOnly,
    Both,
}

impl GenerationMode {
    pub fn generates_header(self) -> bool {
        matches!(self, Self::HeaderOnly | Self::Both)
    }

    pub fn generates_implementation(self) -> bool {
        matches!(self, Self::ImplementationOnly | Self::Both)
    }
}

/// Getter return type used for optional elements in generated classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OptionalElementType {
    #[default]
    #[value(skip)]
    None,
    RawPointer,
    BoostOptional,
    StdOptional,
}

impl OptionalElementType {
    /// Exact match against `raw-pointer`, `boost-optional` or `std-optional`.
    /// Anything else falls back to [`OptionalElementType::None`].
    pub fn from_option(value: &str) -> Self {
        match <Self as clap::ValueEnum>::from_str(value, false) {
            Ok(kind) => kind,
            Err(_) => {
                log::warn!(
                    "Unknown optional element type {:?}, expected raw-pointer, boost-optional or std-optional; using none",
                    value
                );
                Self::None
            }
        }
    }
}

/// Where the client identity for authenticated downloads comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySource {
    pub pkcs12_file: PathBuf,
    /// Empty when no password was given.
    pub password: String,
}

/// Resolved settings for one generation run. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub mode: GenerationMode,
    pub header_file_name: String,
    /// `None` in header-only mode.
    pub implementation_file_name: Option<String>,
    pub output_dir: PathBuf,
    /// Path or URL of the WSDL document.
    pub source_document: String,
    pub service_name: Option<String>,
    pub namespace_mapping: NamespaceMapping,
    pub optional_element_type: OptionalElementType,
    pub skip_sync: bool,
    pub skip_async: bool,
    pub skip_async_jobs: bool,
    pub keep_unused_types: bool,
    pub use_local_files_only: bool,
    pub help_on_missing: bool,
    pub import_paths: Vec<PathBuf>,
    pub export_macro: Option<String>,
    pub namespace: Option<String>,
    pub generate_server_code: bool,
    pub client_identity: Option<IdentitySource>,
}

impl Configuration {
    /// Validates the raw arguments and derives the generation settings.
    ///
    /// | given | mode | header | implementation |
    /// |---|---|---|---|
    /// | `-both base` | both | `base.h` | `base.cpp` |
    /// | `-impl h -o f` | implementation only | `h` | `f` |
    /// | `-o f` | header only | `f` | none |
    ///
    /// `-both` together with `-o` or `-impl` is a usage error.
    pub fn from_args(args: RawArguments) -> Result<Self, Wsdl2CppError> {
        let source_document = args.document.ok_or(UsageError::MissingDocument)?;

        if args.both_base.is_some()
            && (args.output.is_some() || args.implementation_header.is_some())
        {
            return Err(UsageError::ConflictingModes.into());
        }

        let (mode, header_file_name, implementation_file_name, output_path) =
            match (args.both_base, args.implementation_header) {
                (Some(base), _) => {
                    let base_name = file_name(&base);
                    (
                        GenerationMode::Both,
                        format!("{}.h", base_name),
                        Some(format!("{}.cpp", base_name)),
                        Some(base),
                    )
                }
                (None, Some(header)) => {
                    let implementation = match &args.output {
                        Some(output) => file_name(output),
                        None => format!("{}.cpp", file_stem(Path::new(&header))),
                    };
                    (
                        GenerationMode::ImplementationOnly,
                        header,
                        Some(implementation),
                        args.output,
                    )
                }
                (None, None) => {
                    let header = match &args.output {
                        Some(output) => file_name(output),
                        None => format!("{}.h", file_stem(Path::new(&source_document))),
                    };
                    (GenerationMode::HeaderOnly, header, None, args.output)
                }
            };

        let output_dir = Self::output_dir(output_path.as_deref())?;

        let mut namespace_mapping = NamespaceMapping::new();
        for value in &args.namespace_mappings {
            namespace_mapping::add_mapping(&mut namespace_mapping, value)?;
        }

        let optional_element_type = args
            .optional_element_type
            .as_deref()
            .map(OptionalElementType::from_option)
            .unwrap_or_default();

        let client_identity = args.pkcs12_file.map(|pkcs12_file| IdentitySource {
            pkcs12_file,
            password: args.pkcs12_password.unwrap_or_default(),
        });

        Ok(Self {
            mode,
            header_file_name,
            implementation_file_name,
            output_dir,
            source_document,
            service_name: args.service,
            namespace_mapping,
            optional_element_type,
            skip_sync: args.skip_sync,
            skip_async: args.skip_async,
            skip_async_jobs: args.skip_async_jobs,
            keep_unused_types: args.keep_unused_types,
            use_local_files_only: args.use_local_files_only,
            help_on_missing: args.help_on_missing,
            import_paths: args.import_paths,
            export_macro: args.export_macro,
            namespace: args.namespace,
            generate_server_code: args.server,
            client_identity,
        })
    }

    /// Absolute directory of the given output path, or the current directory.
    fn output_dir(output_path: Option<&Path>) -> Result<PathBuf, Wsdl2CppError> {
        let parent = output_path
            .and_then(Path::parent)
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        Self::resolve_path(parent)
    }

    /// Resolves a path to an absolute path.
    /// - Absolute paths are returned as-is
    /// - Relative paths are resolved relative to current directory
    pub fn resolve_path(path: &Path) -> Result<PathBuf, Wsdl2CppError> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().map_err(|e| {
                Wsdl2CppError::Config(format!("Cannot determine current directory: {}", e))
            })?;
            if path == Path::new(".") {
                Ok(current_dir)
            } else {
                Ok(current_dir.join(path))
            }
        }
    }

    /// Full path of the header file this run writes, if any.
    pub fn header_path(&self) -> Option<PathBuf> {
        self.mode
            .generates_header()
            .then(|| self.output_dir.join(&self.header_file_name))
    }

    /// Full path of the implementation file this run writes, if any.
    pub fn implementation_path(&self) -> Option<PathBuf> {
        self.implementation_file_name
            .as_ref()
            .map(|name| self.output_dir.join(name))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Last path component without its extension. Works for URLs too, where the
/// query string is dropped first.
fn file_stem(path: &Path) -> String {
    let name = file_name(path);
    let name = name.split(['?', '#']).next().unwrap_or_default();
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}
