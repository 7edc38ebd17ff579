use console::style;
use geofeat_core::error::GeofeatError;
use std::fmt;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Attach suggestions to a library error for the given subcommand
pub fn from_geofeat(error: GeofeatError, command: &str) -> CliError {
    let help = format!("Run: geofeat {} --help", command);
    let base = CliError::new(error.to_string()).with_help(help);

    match error {
        GeofeatError::UnparseableGeometry { .. } => base
            .with_suggestion("Start the WKT with POINT, LINESTRING, POLYGON, MULTIPOINT, MULTILINESTRING, MULTIPOLYGON or GEOMETRYCOLLECTION")
            .with_suggestion("EWKT prefixes such as SRID=4326; are not supported"),
        GeofeatError::MalformedGeometry { .. } => base
            .with_suggestion("Check that the parentheses match the geometry type")
            .with_suggestion("Or drop --strict to empty malformed parts instead of failing"),
        GeofeatError::UnrecognizedType { .. } | GeofeatError::UnsupportedGeometryType { .. } => base
            .with_suggestion("Use a GeoJSON geometry, Feature or FeatureCollection")
            .with_suggestion("Or pass --legacy-markers to emit a placeholder for unknown geometry types"),
        GeofeatError::MissingGeometry => {
            base.with_suggestion("Every feature needs a non-null \"geometry\" member")
        }
        GeofeatError::GeoJson(_) => base.with_suggestion("Check the input is valid GeoJSON"),
        GeofeatError::UnsupportedProximityGeometry { .. } => {
            base.with_suggestion("Search around a single Point")
        }
        GeofeatError::InvalidProximityInput { .. } => {
            base.with_suggestion("Use finite coordinates with latitude in [-90, 90] and a finite radius")
        }
        GeofeatError::ConfigMissing { .. } | GeofeatError::ConfigInvalid { .. } => base
            .with_suggestion("Check the --config file for typos")
            .with_suggestion("Run: geofeat config")
            .with_help("Run: geofeat --help"),
        GeofeatError::Io(_) | GeofeatError::Serialization(_) => base,
    }
}

/// Create error for input that is not JSON at all
pub fn input_not_json(reason: &str, command: &str) -> CliError {
    CliError::new("Input is not valid JSON")
        .with_context(format!("Error: {}", reason))
        .with_suggestion("Quote the document so the shell passes it as one argument")
        .with_suggestion("Or pass - and pipe the document on stdin")
        .with_help(format!("Run: geofeat {} --help", command))
}

/// Create error for a missing candidates file
pub fn candidates_not_found(path: &str) -> CliError {
    CliError::new("Candidates file not found")
        .with_context(format!("The specified candidates file does not exist.\n\nPath: {}", path))
        .with_suggestion("Check the file path and try again")
        .with_help("Run: geofeat near --help")
}
