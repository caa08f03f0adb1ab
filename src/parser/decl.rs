//! Declaration parsers: one function per declaration kind (spec §4.2
//! "Declaration dispatch").

use crate::ast::{
    AssumptionDecl, BindDecl, BranchDecl, CalibrateDecl, DateLit, Declaration, DistributionExpr,
    ExprKind, ImpactDecl, ImportDecl, InterpolationMethod, ModelExpr, OnTrigger, ParameterDecl,
    SimulateDecl, SimulateMethod, VariableDecl, WatchDecl, WatchRule, WatchSeverity,
    SENTINEL_LIST_NAME,
};
use crate::token::TokenKind;

use super::expr::literal_numeric;
use super::Parser;

impl Parser {
    pub(super) fn parse_declaration(&mut self) -> Option<Declaration> {
        match self.peek_kind() {
            TokenKind::VariableKw => self.parse_variable(),
            TokenKind::AssumptionKw => self.parse_assumption(),
            TokenKind::ParameterKw => self.parse_parameter(),
            TokenKind::BranchKw => self.parse_branch(),
            TokenKind::ImpactKw => self.parse_impact(),
            TokenKind::SimulateKw => self.parse_simulate(),
            TokenKind::WatchKw => self.parse_watch(),
            TokenKind::CalibrateKw => self.parse_calibrate(),
            TokenKind::ImportKw => self.parse_import(),
            _ => None,
        }
    }

    pub(super) fn parse_import(&mut self) -> Option<Declaration> {
        let start = self.advance(); // 'import'
        let path = self.expect(TokenKind::String)?;
        self.expect(TokenKind::AsKw);
        let alias = self.expect_ident_like()?;
        let span = start.span.merge(alias.span);
        Some(Declaration::Import(ImportDecl {
            path: path.lexeme,
            alias: alias.lexeme,
            span,
        }))
    }

    fn parse_variable(&mut self) -> Option<Declaration> {
        let start = self.advance(); // 'variable'
        let name = self.expect_ident_like()?;
        self.expect(TokenKind::LeftBrace);
        let mut decl = VariableDecl {
            name: name.lexeme,
            description: None,
            unit: None,
            label: None,
            icon: None,
            color: None,
            anchors: Vec::new(),
            depends_on: Vec::new(),
            growth: None,
            uncertainty: None,
            interpolation: InterpolationMethod::default(),
            span: start.span,
        };
        loop {
            if self.at(TokenKind::RightBrace) || self.is_eof() {
                break;
            }
            match self.peek_kind() {
                TokenKind::DescriptionKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.description = self.parse_string_value();
                }
                TokenKind::UnitKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.unit = self.parse_string_value();
                }
                TokenKind::LabelKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.label = self.parse_string_value();
                }
                TokenKind::IconKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.icon = self.parse_string_value();
                }
                TokenKind::ColorKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.color = self.parse_string_value();
                }
                TokenKind::DependsOnKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.depends_on = self.parse_dotted_ident_array();
                }
                TokenKind::GrowthKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    match self.parse_model_value() {
                        Some(m) => decl.growth = Some(m),
                        None => break,
                    }
                }
                TokenKind::UncertaintyKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    match self.parse_distribution_value() {
                        Some(d) => decl.uncertainty = Some(d),
                        None => break,
                    }
                }
                TokenKind::InterpolationKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.interpolation = self.parse_interpolation_method();
                }
                TokenKind::Date | TokenKind::Number => match self.parse_anchor() {
                    Some(anchor) => decl.anchors.push(anchor),
                    None => break,
                },
                _ => {
                    self.error("unexpected token in variable body");
                    self.advance();
                }
            }
        }
        let end = self.expect(TokenKind::RightBrace);
        decl.span = start.span.merge(end.map(|t| t.span).unwrap_or(decl.span));
        Some(Declaration::Variable(decl))
    }

    fn parse_anchor(&mut self) -> Option<(DateLit, crate::ast::Expr)> {
        let tok = self.advance(); // Date or Number
        let date = match tok.kind {
            TokenKind::Date => super::expr::parse_date_lexeme(&tok.lexeme),
            _ => DateLit::year_only(tok.lexeme.parse::<f64>().unwrap_or(0.0) as i32),
        };
        self.expect(TokenKind::Colon);
        let value = self.parse_expr()?;
        Some((date, value))
    }

    fn parse_assumption(&mut self) -> Option<Declaration> {
        let start = self.advance(); // 'assumption'
        let name = self.expect_ident_like()?;
        self.expect(TokenKind::LeftBrace);
        let mut decl = AssumptionDecl {
            name: name.lexeme,
            value: None,
            by: None,
            source: None,
            confidence: None,
            uncertainty: None,
            bind: None,
            watch: None,
            span: start.span,
        };
        loop {
            if self.at(TokenKind::RightBrace) || self.is_eof() {
                break;
            }
            match self.peek_kind() {
                TokenKind::ValueKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    match self.parse_expr() {
                        Some(e) => decl.value = Some(e),
                        None => break,
                    }
                }
                TokenKind::ByKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.by = self.parse_date_value();
                }
                TokenKind::SourceKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.source = self.parse_string_value();
                }
                TokenKind::ConfidenceKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.confidence = self.parse_expr().and_then(|e| literal_numeric(&e));
                }
                TokenKind::UncertaintyKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    match self.parse_distribution_value() {
                        Some(d) => decl.uncertainty = Some(d),
                        None => break,
                    }
                }
                TokenKind::BindKw => {
                    decl.bind = self.parse_bind();
                }
                TokenKind::WatchKw => {
                    decl.watch = match self.parse_watch() {
                        Some(Declaration::Watch(w)) => Some(w),
                        _ => None,
                    };
                }
                _ => {
                    self.error("unexpected token in assumption body");
                    self.advance();
                }
            }
        }
        let end = self.expect(TokenKind::RightBrace);
        decl.span = start.span.merge(end.map(|t| t.span).unwrap_or(decl.span));
        Some(Declaration::Assumption(decl))
    }

    fn parse_parameter(&mut self) -> Option<Declaration> {
        let start = self.advance(); // 'parameter'
        let name = self.expect_ident_like()?;
        self.expect(TokenKind::LeftBrace);
        let mut decl = ParameterDecl {
            name: name.lexeme,
            value: None,
            range: None,
            label: None,
            unit: None,
            step: None,
            format: None,
            control: None,
            icon: None,
            color: None,
            source: None,
            description: None,
            span: start.span,
        };
        loop {
            if self.at(TokenKind::RightBrace) || self.is_eof() {
                break;
            }
            match self.peek_kind() {
                TokenKind::ValueKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    match self.parse_expr() {
                        Some(e) => decl.value = Some(e),
                        None => break,
                    }
                }
                TokenKind::RangeKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    match self.parse_range() {
                        Some(r) => decl.range = Some(r),
                        None => break,
                    }
                }
                TokenKind::LabelKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.label = self.parse_string_value();
                }
                TokenKind::UnitKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.unit = self.parse_string_value();
                }
                TokenKind::StepKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    match self.parse_expr() {
                        Some(e) => decl.step = Some(e),
                        None => break,
                    }
                }
                TokenKind::FormatKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.format = self.parse_string_value();
                }
                TokenKind::ControlKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.control = self.parse_string_value();
                }
                TokenKind::IconKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.icon = self.parse_string_value();
                }
                TokenKind::ColorKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.color = self.parse_string_value();
                }
                TokenKind::SourceKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.source = self.parse_string_value();
                }
                TokenKind::DescriptionKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.description = self.parse_string_value();
                }
                _ => {
                    self.error("unexpected token in parameter body");
                    self.advance();
                }
            }
        }
        let end = self.expect(TokenKind::RightBrace);
        decl.span = start.span.merge(end.map(|t| t.span).unwrap_or(decl.span));
        Some(Declaration::Parameter(decl))
    }

    fn parse_range(&mut self) -> Option<(crate::ast::Expr, crate::ast::Expr)> {
        self.expect(TokenKind::LeftBracket)?;
        let lo = self.parse_expr()?;
        self.expect(TokenKind::Comma);
        let hi = self.parse_expr()?;
        self.expect(TokenKind::RightBracket);
        Some((lo, hi))
    }

    fn parse_branch(&mut self) -> Option<Declaration> {
        let start = self.advance(); // 'branch'
        let name = self.expect(TokenKind::String)?;
        self.expect(TokenKind::WhenKw);
        let condition = self.parse_expr()?;
        self.expect(TokenKind::LeftBrace);
        let mut decl = BranchDecl {
            name: name.lexeme,
            condition,
            probability: None,
            fork: None,
            declarations: Vec::new(),
            span: start.span,
        };
        loop {
            if self.at(TokenKind::RightBrace) || self.is_eof() {
                break;
            }
            match self.peek_kind() {
                TokenKind::ProbabilityKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.probability = self.parse_expr().and_then(|e| literal_numeric(&e));
                }
                TokenKind::ForkKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.fork = self.parse_string_value();
                }
                TokenKind::VariableKw
                | TokenKind::AssumptionKw
                | TokenKind::ParameterKw
                | TokenKind::BranchKw
                | TokenKind::ImpactKw
                | TokenKind::SimulateKw
                | TokenKind::WatchKw
                | TokenKind::CalibrateKw
                | TokenKind::ImportKw => {
                    if let Some(nested) = self.parse_declaration() {
                        decl.declarations.push(nested);
                    }
                }
                _ => {
                    self.error("unexpected token in branch body");
                    self.advance();
                }
            }
        }
        let end = self.expect(TokenKind::RightBrace);
        decl.span = start.span.merge(end.map(|t| t.span).unwrap_or(decl.span));
        Some(Declaration::Branch(decl))
    }

    fn parse_impact(&mut self) -> Option<Declaration> {
        let start = self.advance(); // 'impact'
        if self.at(TokenKind::OnKw) {
            self.advance();
            self.expect(TokenKind::Colon);
            let derives_from = self.parse_dotted_ident_array();
            let span = start.span;
            return Some(Declaration::Impact(ImpactDecl {
                name: SENTINEL_LIST_NAME.to_string(),
                derives_from,
                formula: None,
                label: None,
                unit: None,
                icon: None,
                color: None,
                span,
            }));
        }
        let name = self.expect_ident_like()?;
        self.expect(TokenKind::LeftBrace);
        let mut decl = ImpactDecl {
            name: name.lexeme,
            derives_from: Vec::new(),
            formula: None,
            label: None,
            unit: None,
            icon: None,
            color: None,
            span: start.span,
        };
        loop {
            if self.at(TokenKind::RightBrace) || self.is_eof() {
                break;
            }
            match self.peek_kind() {
                TokenKind::DerivesFromKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.derives_from = self.parse_dotted_ident_array();
                }
                TokenKind::FormulaKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    match self.parse_expr() {
                        Some(e) => decl.formula = Some(e),
                        None => break,
                    }
                }
                TokenKind::LabelKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.label = self.parse_string_value();
                }
                TokenKind::UnitKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.unit = self.parse_string_value();
                }
                TokenKind::IconKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.icon = self.parse_string_value();
                }
                TokenKind::ColorKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.color = self.parse_string_value();
                }
                _ => {
                    self.error("unexpected token in impact body");
                    self.advance();
                }
            }
        }
        let end = self.expect(TokenKind::RightBrace);
        decl.span = start.span.merge(end.map(|t| t.span).unwrap_or(decl.span));
        Some(Declaration::Impact(decl))
    }

    fn parse_simulate(&mut self) -> Option<Declaration> {
        let start = self.advance(); // 'simulate'
        self.expect(TokenKind::LeftBrace);
        let mut decl = SimulateDecl {
            runs: None,
            method: None,
            seed: None,
            output: None,
            percentiles: Vec::new(),
            convergence: None,
            timeout: None,
            span: start.span,
        };
        loop {
            if self.at(TokenKind::RightBrace) || self.is_eof() {
                break;
            }
            match self.peek_kind() {
                TokenKind::RunsKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.runs = self
                        .parse_expr()
                        .and_then(|e| literal_numeric(&e))
                        .map(|v| v.max(0.0) as u64);
                }
                TokenKind::MethodKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.method = match self.advance().kind {
                        TokenKind::MonteCarloKw => Some(SimulateMethod::MonteCarlo),
                        TokenKind::LatinHypercubeKw => Some(SimulateMethod::LatinHypercube),
                        TokenKind::SobolKw => Some(SimulateMethod::Sobol),
                        _ => None,
                    };
                }
                TokenKind::SeedKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.seed = self
                        .parse_expr()
                        .and_then(|e| literal_numeric(&e))
                        .map(|v| v as u32);
                }
                TokenKind::OutputKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.output = self.parse_string_value();
                }
                TokenKind::PercentilesKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.percentiles = self.parse_number_array();
                }
                TokenKind::ConvergenceKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.convergence = self.parse_expr().and_then(|e| literal_numeric(&e));
                }
                TokenKind::TimeoutKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    match self.parse_expr() {
                        Some(e) => decl.timeout = Some(e),
                        None => break,
                    }
                }
                _ => {
                    self.error("unexpected token in simulate body");
                    self.advance();
                }
            }
        }
        let end = self.expect(TokenKind::RightBrace);
        decl.span = start.span.merge(end.map(|t| t.span).unwrap_or(decl.span));
        Some(Declaration::Simulate(decl))
    }

    fn parse_watch(&mut self) -> Option<Declaration> {
        let start = self.advance(); // 'watch'
        self.expect(TokenKind::LeftBrace);
        let mut decl = WatchDecl {
            target: None,
            rules: Vec::new(),
            on_trigger: None,
            span: start.span,
        };
        loop {
            if self.at(TokenKind::RightBrace) || self.is_eof() {
                break;
            }
            match self.peek_kind() {
                TokenKind::TargetKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.target = self.expect_ident_like().map(|t| t.lexeme);
                }
                TokenKind::RulesKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    decl.rules = self.parse_watch_rules();
                }
                TokenKind::ActionsKw => {
                    decl.on_trigger = self.parse_on_trigger();
                }
                _ => {
                    self.error("unexpected token in watch body");
                    self.advance();
                }
            }
        }
        let end = self.expect(TokenKind::RightBrace);
        decl.span = start.span.merge(end.map(|t| t.span).unwrap_or(decl.span));
        Some(Declaration::Watch(decl))
    }

    /// `[ warn: <expr>, error: <expr>, … ]` — the rule's severity keyword
    /// doubles as its field name.
    fn parse_watch_rules(&mut self) -> Vec<WatchRule> {
        let mut rules = Vec::new();
        if self.expect(TokenKind::LeftBracket).is_none() {
            return rules;
        }
        while !self.at(TokenKind::RightBracket) && !self.is_eof() {
            let severity = match self.peek_kind() {
                TokenKind::WarnKw => {
                    self.advance();
                    Some(WatchSeverity::Warn)
                }
                TokenKind::ErrorKw => {
                    self.advance();
                    Some(WatchSeverity::Error)
                }
                _ => {
                    self.error("expected 'warn' or 'error' rule severity");
                    self.advance();
                    None
                }
            };
            if let Some(severity) = severity {
                self.expect(TokenKind::Colon);
                match self.parse_expr() {
                    Some(condition) => rules.push(WatchRule { severity, condition }),
                    None => break,
                }
            }
            if self.at(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RightBracket);
        rules
    }

    fn parse_on_trigger(&mut self) -> Option<OnTrigger> {
        self.advance(); // 'actions'
        self.expect(TokenKind::Colon);
        self.expect(TokenKind::LeftBrace)?;
        let mut trigger = OnTrigger::default();
        loop {
            if self.at(TokenKind::RightBrace) || self.is_eof() {
                break;
            }
            match self.peek_kind() {
                TokenKind::RecalculateKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    trigger.recalculate = matches!(self.advance().kind, TokenKind::TrueKw);
                }
                TokenKind::NotifyKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    trigger.notify = self.parse_dotted_ident_array();
                }
                TokenKind::SuggestKw => {
                    self.advance();
                    self.expect(TokenKind::Colon);
                    trigger.suggest = self.parse_string_value();
                }
                _ => {
                    self.error("unexpected token in actions body");
                    self.advance();
                }
            }
        }
        self.expect(TokenKind::RightBrace);
        Some(trigger)
    }

    fn parse_bind(&mut self) -> Option<BindDecl> {
        let start = self.advance(); // 'bind'
        self.expect(TokenKind::LeftBrace)?;
        let mut target = None;
        let mut properties = Vec::new();
        loop {
            if self.at(TokenKind::RightBrace) || self.is_eof() {
                break;
            }
            if self.at(TokenKind::TargetKw) {
                self.advance();
                self.expect(TokenKind::Colon);
                target = self.expect_ident_like().map(|t| t.lexeme);
            } else if let Some(name) = self.expect_ident_like() {
                self.expect(TokenKind::Colon);
                match self.parse_expr() {
                    Some(value) => properties.push((name.lexeme, value)),
                    None => break,
                }
            } else {
                self.advance();
            }
            if self.at(TokenKind::Comma) {
                self.advance();
            }
        }
        let end = self.expect(TokenKind::RightBrace);
        let span = start.span.merge(end.map(|t| t.span).unwrap_or(start.span));
        Some(BindDecl {
            target,
            properties,
            span,
        })
    }

    fn parse_calibrate(&mut self) -> Option<Declaration> {
        let start = self.advance(); // 'calibrate'
        let name = if self.at(TokenKind::LeftBrace) {
            None
        } else {
            self.expect_ident_like().map(|t| t.lexeme)
        };
        self.expect(TokenKind::LeftBrace)?;
        let mut properties = Vec::new();
        loop {
            if self.at(TokenKind::RightBrace) || self.is_eof() {
                break;
            }
            if let Some(key) = self.expect_ident_like() {
                self.expect(TokenKind::Colon);
                match self.parse_expr() {
                    Some(value) => properties.push((key.lexeme, value)),
                    None => break,
                }
            } else {
                self.advance();
            }
            if self.at(TokenKind::Comma) {
                self.advance();
            }
        }
        let end = self.expect(TokenKind::RightBrace);
        let span = start.span.merge(end.map(|t| t.span).unwrap_or(start.span));
        Some(Declaration::Calibrate(CalibrateDecl {
            name,
            properties,
            span,
        }))
    }

    // ------------------------------------------------------------------
    // Shared value parsers
    // ------------------------------------------------------------------

    fn parse_string_value(&mut self) -> Option<String> {
        self.expect(TokenKind::String).map(|t| t.lexeme)
    }

    fn parse_date_value(&mut self) -> Option<DateLit> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::Date => Some(super::expr::parse_date_lexeme(&tok.lexeme)),
            TokenKind::Number => tok
                .lexeme
                .parse::<f64>()
                .ok()
                .map(|y| DateLit::year_only(y as i32)),
            _ => {
                self.error_at(tok.span, "expected a date or year");
                None
            }
        }
    }

    fn parse_distribution_value(&mut self) -> Option<DistributionExpr> {
        match self.parse_expr()?.kind {
            ExprKind::Distribution(d) => Some(d),
            _ => None,
        }
    }

    fn parse_model_value(&mut self) -> Option<ModelExpr> {
        match self.parse_expr()?.kind {
            ExprKind::Model(m) => Some(m),
            _ => None,
        }
    }

    fn parse_interpolation_method(&mut self) -> InterpolationMethod {
        match self.advance().kind {
            TokenKind::StepKw => InterpolationMethod::Step,
            TokenKind::SplineKw => InterpolationMethod::Spline,
            _ => InterpolationMethod::Linear,
        }
    }

    /// `[ ident, ident.ident, … ]` — used for `depends_on`, `derives_from`,
    /// and `notify` lists, which may contain dotted references.
    fn parse_dotted_ident_array(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        if self.expect(TokenKind::LeftBracket).is_none() {
            return out;
        }
        while !self.at(TokenKind::RightBracket) && !self.is_eof() {
            match self.parse_dotted_ident() {
                Some(name) => out.push(name),
                None => {
                    self.advance();
                }
            }
            if self.at(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RightBracket);
        out
    }

    fn parse_dotted_ident(&mut self) -> Option<String> {
        let first = self.expect_ident_like()?;
        let mut name = first.lexeme;
        while self.at(TokenKind::Dot) {
            self.advance();
            match self.expect_ident_like() {
                Some(seg) => {
                    name.push('.');
                    name.push_str(&seg.lexeme);
                }
                None => break,
            }
        }
        Some(name)
    }

    pub(super) fn parse_string_array(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        if self.expect(TokenKind::LeftBracket).is_none() {
            return out;
        }
        while !self.at(TokenKind::RightBracket) && !self.is_eof() {
            match self.expect(TokenKind::String) {
                Some(tok) => out.push(tok.lexeme),
                None => {
                    self.advance();
                }
            }
            if self.at(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RightBracket);
        out
    }

    fn parse_number_array(&mut self) -> Vec<f64> {
        let mut out = Vec::new();
        if self.expect(TokenKind::LeftBracket).is_none() {
            return out;
        }
        while !self.at(TokenKind::RightBracket) && !self.is_eof() {
            match self.parse_expr().and_then(|e| literal_numeric(&e)) {
                Some(v) => out.push(v),
                None => {
                    self.advance();
                }
            }
            if self.at(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RightBracket);
        out
    }
}
