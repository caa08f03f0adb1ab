//! The closed token enumeration (spec §3.1).
//!
//! Keywords are matched case-sensitively against a fixed table; everything
//! else falls back to [`TokenKind::Identifier`].

/// Every kind of token the lexer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ---- literals ----
    Number,
    Percentage,
    Currency,
    String,
    Boolean,
    Date,
    Duration,
    Identifier,

    // ---- punctuation ----
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    Colon,
    Comma,
    Dot,
    Arrow,
    PlusMinus,
    Eq,

    // ---- arithmetic operators ----
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Percent,

    // ---- comparison operators ----
    Gt,
    Lt,
    GtEq,
    LtEq,
    EqEq,
    BangEq,

    // ---- keywords ----
    ScenarioKw,
    VariableKw,
    AssumptionKw,
    ParameterKw,
    BranchKw,
    ImpactKw,
    SimulateKw,
    WatchKw,
    CalibrateKw,
    BindKw,
    ImportKw,
    AsKw,
    WhenKw,
    AndKw,
    OrKw,
    NotKw,
    TrueKw,
    FalseKw,
    NormalKw,
    UniformKw,
    BetaKw,
    TriangularKw,
    LognormalKw,
    CustomKw,
    LinearKw,
    LogisticKw,
    ExponentialKw,
    SigmoidKw,
    PolynomialKw,
    YearlyKw,
    MonthlyKw,
    WeeklyKw,
    DailyKw,
    MonteCarloKw,
    LatinHypercubeKw,
    SobolKw,
    TimeframeKw,
    ResolutionKw,
    ConfidenceKw,
    AuthorKw,
    VersionKw,
    DescriptionKw,
    TagsKw,
    SubtitleKw,
    CategoryKw,
    IconKw,
    ColorKw,
    DifficultyKw,
    ValueKw,
    SourceKw,
    FieldKw,
    OutputKw,
    MethodKw,
    SeedKw,
    LabelKw,
    StepKw,
    FormatKw,
    ControlKw,
    UnitKw,
    DependsOnKw,
    GrowthKw,
    UncertaintyKw,
    InterpolationKw,
    ByKw,
    ProbabilityKw,
    ForkKw,
    DerivesFromKw,
    FormulaKw,
    OnKw,
    RunsKw,
    PercentilesKw,
    ConvergenceKw,
    TimeoutKw,
    TargetKw,
    RulesKw,
    SeverityKw,
    WarnKw,
    ErrorKw,
    ActionsKw,
    RecalculateKw,
    NotifyKw,
    SuggestKw,
    RangeKw,
    MinKw,
    MaxKw,
    SplineKw,

    Eof,
}

impl TokenKind {
    /// Look up a keyword by its exact (case-sensitive) lexeme.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        use TokenKind::*;
        Some(match word {
            "scenario" => ScenarioKw,
            "variable" => VariableKw,
            "assumption" => AssumptionKw,
            "parameter" => ParameterKw,
            "branch" => BranchKw,
            "impact" => ImpactKw,
            "simulate" => SimulateKw,
            "watch" => WatchKw,
            "calibrate" => CalibrateKw,
            "bind" => BindKw,
            "import" => ImportKw,
            "as" => AsKw,
            "when" => WhenKw,
            "and" => AndKw,
            "or" => OrKw,
            "not" => NotKw,
            "normal" => NormalKw,
            "uniform" => UniformKw,
            "beta" => BetaKw,
            "triangular" => TriangularKw,
            "lognormal" => LognormalKw,
            "custom" => CustomKw,
            "linear" => LinearKw,
            "logistic" => LogisticKw,
            "exponential" => ExponentialKw,
            "sigmoid" => SigmoidKw,
            "polynomial" => PolynomialKw,
            "yearly" => YearlyKw,
            "monthly" => MonthlyKw,
            "weekly" => WeeklyKw,
            "daily" => DailyKw,
            "monte_carlo" => MonteCarloKw,
            "latin_hypercube" => LatinHypercubeKw,
            "sobol" => SobolKw,
            "timeframe" => TimeframeKw,
            "resolution" => ResolutionKw,
            "confidence" => ConfidenceKw,
            "author" => AuthorKw,
            "version" => VersionKw,
            "description" => DescriptionKw,
            "tags" => TagsKw,
            "subtitle" => SubtitleKw,
            "category" => CategoryKw,
            "icon" => IconKw,
            "color" => ColorKw,
            "difficulty" => DifficultyKw,
            "value" => ValueKw,
            "source" => SourceKw,
            "field" => FieldKw,
            "output" => OutputKw,
            "method" => MethodKw,
            "seed" => SeedKw,
            "label" => LabelKw,
            "step" => StepKw,
            "format" => FormatKw,
            "control" => ControlKw,
            "unit" => UnitKw,
            "depends_on" => DependsOnKw,
            "growth" => GrowthKw,
            "uncertainty" => UncertaintyKw,
            "interpolation" => InterpolationKw,
            "by" => ByKw,
            "probability" => ProbabilityKw,
            "fork" => ForkKw,
            "derives_from" => DerivesFromKw,
            "formula" => FormulaKw,
            "on" => OnKw,
            "runs" => RunsKw,
            "percentiles" => PercentilesKw,
            "convergence" => ConvergenceKw,
            "timeout" => TimeoutKw,
            "target" => TargetKw,
            "rules" => RulesKw,
            "severity" => SeverityKw,
            "warn" => WarnKw,
            "error" => ErrorKw,
            "actions" => ActionsKw,
            "recalculate" => RecalculateKw,
            "notify" => NotifyKw,
            "suggest" => SuggestKw,
            "range" => RangeKw,
            "min" => MinKw,
            "max" => MaxKw,
            "spline" => SplineKw,
            _ => return None,
        })
    }

    /// Keyword tokens whose lexeme must *also* be usable as a free
    /// identifier (spec §4.2 "Identifier flexibility").
    pub fn is_soft_keyword(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            ValueKw
                | SourceKw
                | FieldKw
                | OutputKw
                | MethodKw
                | SeedKw
                | LabelKw
                | StepKw
                | FormatKw
                | ControlKw
                | IconKw
                | ColorKw
                | CategoryKw
                | SubtitleKw
                | DifficultyKw
        )
    }
}
