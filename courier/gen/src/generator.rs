//! The generation driver.
//!
//! [`generate_adapters`] is the pure core: declarations in, adapters and
//! diagnostics out. [`Generator`] wraps it with scanning, configuration and
//! file output for `build.rs` scripts and the `courier-gen` binary.
//!
//! ## Examples
//!
//! ```no_run
//! // build.rs
//! use courier_gen::Generator;
//!
//! fn main() {
//!     let report = Generator::new()
//!         .scan_path("src")
//!         .output_dir("src/generated")
//!         .backend("reqwest-blocking")
//!         .run()
//!         .expect("courier configuration is valid");
//!
//!     for diagnostic in &report.diagnostics {
//!         println!("cargo:warning={diagnostic}");
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use colored::Colorize;
use courier_define::ContractDeclaration;
use tracing::info;

use crate::assembler::{AdapterAssembler, AdapterType, AssemblerOptions};
use crate::backend::{Backend, BackendRegistry};
use crate::collector::collect_contracts;
use crate::config::GeneratorConfig;
use crate::date_pattern::DateFormat;
use crate::diagnostics::{DiagnosticContext, Diagnostics, Severity};
use crate::errors::GeneratorError;
use crate::output::write_adapters;

/// Builds one adapter per contract, in input order.
///
/// A contract is skipped with an error diagnostic when its default date
/// pattern is invalid, or when an earlier contract already produced the
/// same adapter identity or module name.
pub fn generate_adapters(
    contracts: &[ContractDeclaration],
    backend: &dyn Backend,
    options: &AssemblerOptions,
) -> (Vec<AdapterType>, Diagnostics) {
    let assembler = AdapterAssembler::new(backend, options);
    let mut diagnostics = Diagnostics::new();
    let mut adapters = Vec::new();
    let mut identities: HashMap<String, String> = HashMap::new();
    let mut modules: HashMap<String, String> = HashMap::new();

    for contract in contracts {
        let context = DiagnosticContext::contract(&contract.qualified_name);
        let probe = AdapterType::new(contract, backend.id(), options);

        if let Some(earlier) = identities.get(&probe.identity()) {
            diagnostics.error(
                format!("adapter for `{}` is already generated from `{earlier}`", probe.identity()),
                context,
            );
            continue;
        }
        if let Some(earlier) = modules.get(&probe.module_name()) {
            diagnostics.error(
                format!(
                    "adapter module `{}` is already generated from `{earlier}`",
                    probe.module_name()
                ),
                context,
            );
            continue;
        }
        if let Some(pattern) = contract.default_date_pattern()
            && let Err(err) = DateFormat::parse(pattern)
        {
            diagnostics.error(format!("invalid date_pattern \"{pattern}\": {err}"), context);
            continue;
        }

        identities.insert(probe.identity(), contract.qualified_name.clone());
        modules.insert(probe.module_name(), contract.qualified_name.clone());
        adapters.push(assembler.assemble(contract, &mut diagnostics));
    }

    (adapters, diagnostics)
}

/// Outcome of a [`Generator::run`].
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Contracts found by the scan.
    pub contracts: usize,
    /// Adapters rendered.
    pub adapters: usize,
    /// Method implementations across all adapters.
    pub methods: usize,
    /// Files written, or that would be written in a dry run.
    pub written: Vec<PathBuf>,
    pub diagnostics: Diagnostics,
}

impl GenerationReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// One-line colored summary for the terminal.
    pub fn summary(&self) -> String {
        let errors = self.diagnostics.count(Severity::Error);
        let warnings = self.diagnostics.count(Severity::Warning);
        let counts = format!(
            "{} contract(s), {} adapter(s), {} method(s), {} file(s)",
            self.contracts,
            self.adapters,
            self.methods,
            self.written.len()
        );
        let issues = format!("{errors} error(s), {warnings} warning(s)");
        if errors > 0 {
            format!("{} {counts}; {}", "failed:".red().bold(), issues.red())
        } else if warnings > 0 {
            format!("{} {counts}; {}", "generated:".green().bold(), issues.yellow())
        } else {
            format!("{} {counts}", "generated:".green().bold())
        }
    }
}

/// Builder that scans, generates and writes adapters.
pub struct Generator {
    config: GeneratorConfig,
    scan_paths: Vec<PathBuf>,
    dry_run: bool,
    registry: BackendRegistry,
}

impl Generator {
    /// A generator with default configuration and the built-in backends.
    pub fn new() -> Self {
        Self::from_config(GeneratorConfig::default())
    }

    pub fn from_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            scan_paths: Vec::new(),
            dry_run: false,
            registry: BackendRegistry::builtin(),
        }
    }

    /// Adds a directory to scan. Any explicit scan path replaces the
    /// configured list.
    pub fn scan_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.scan_paths.push(path.into());
        self
    }

    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_dir = path.into();
        self
    }

    pub fn backend(mut self, id: impl Into<String>) -> Self {
        self.config.backend = id.into();
        self
    }

    pub fn adapter_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.adapter_suffix = suffix.into();
        self
    }

    /// Prints files instead of writing them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Makes an additional backend selectable by id.
    pub fn register_backend(mut self, backend: impl Backend + 'static) -> Self {
        self.registry.register(backend);
        self
    }

    /// The configuration after builder overrides.
    pub fn effective_config(&self) -> GeneratorConfig {
        let mut config = self.config.clone();
        if !self.scan_paths.is_empty() {
            config.scan_paths = self.scan_paths.clone();
        }
        config
    }

    /// Scans, generates and writes.
    ///
    /// ## Errors
    ///
    /// Returns a [`GeneratorError`] for invalid configuration, an unknown
    /// backend or a missing scan root. Everything else is reported in
    /// [`GenerationReport::diagnostics`].
    pub fn run(&self) -> Result<GenerationReport, GeneratorError> {
        let config = self.effective_config();
        config.validate()?;
        let backend = self.registry.resolve(&config.backend)?;
        info!(backend = backend.id(), output = %config.output_dir.display(), "Generating adapters");

        let mut diagnostics = Diagnostics::new();
        let mut contracts = Vec::new();
        let exclude = [config.output_dir.clone()];
        for root in &config.scan_paths {
            contracts.extend(collect_contracts(root, &exclude, &mut diagnostics)?);
        }

        let options = AssemblerOptions {
            adapter_suffix: config.adapter_suffix.clone(),
        };
        let (adapters, generated) = generate_adapters(&contracts, backend, &options);
        diagnostics.extend(generated);

        let written = write_adapters(&adapters, &config.output_dir, self.dry_run, &mut diagnostics);

        Ok(GenerationReport {
            contracts: contracts.len(),
            adapters: adapters.len(),
            methods: adapters.iter().map(|adapter| adapter.methods.len()).sum(),
            written,
            diagnostics,
        })
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}
