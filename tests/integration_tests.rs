use armc::analyze;
use armc::codegen::{OpCode, Operand, Quadruple};
use armc::diagnostic::Phase;
use armc::lexer::{Lexer, TokenKind};

fn count_ops(quads: &[Quadruple], op: OpCode) -> usize {
    quads.iter().filter(|q| q.op == op).count()
}

#[test]
fn happy_path() {
    let analysis = analyze("Robot r1\nr1.base = 90\nr1.hombro = 45\nr1.espera = 2").unwrap();

    assert!(analysis.errors.is_empty(), "{:?}", analysis.errors);
    assert!(analysis.syntax_valid);
    assert!(analysis.semantic_valid);
    assert_eq!(analysis.symbol_table().len(), 4);
    assert_eq!(analysis.symbol_table()[0].method, "DECLARACION");
    assert!(!analysis.quadruples().is_empty());
    assert_eq!(analysis.quadruples()[0].op, OpCode::Declarar);
}

#[test]
fn duplicate_declaration() {
    let analysis = analyze("Robot r1\nRobot r1\nr1.base = 90").unwrap();

    assert_eq!(analysis.errors.len(), 1);
    assert_eq!(analysis.errors[0].phase, Phase::Semantic);
    assert!(analysis.errors[0].to_string().contains("'r1' declared more than once"));
    assert_eq!(analysis.symbol_table.declarations().count(), 2);
    assert!(analysis.quadruples().is_empty());
}

#[test]
fn undeclared_robot() {
    let analysis = analyze("r1.base = 90").unwrap();

    assert!(analysis
        .errors
        .iter()
        .any(|e| e.message.contains("'r1' used without prior declaration")));
    assert!(analysis.quadruples().is_empty());
}

#[test]
fn unknown_character() {
    let analysis = analyze("Robot r1\nr1.base = 9@0").unwrap();

    let lexical: Vec<_> = analysis
        .errors
        .iter()
        .filter(|e| e.phase == Phase::Lexical)
        .collect();
    assert_eq!(lexical.len(), 1);
    assert_eq!(
        lexical[0].to_string(),
        "lexical error at line 2, column 12: unrecognized character '@'"
    );
    assert_eq!((lexical[0].line, lexical[0].column), (2, Some(12)));

    let tail: Vec<_> = analysis.tokens.iter().rev().take(2).map(|t| t.kind).collect();
    assert_eq!(tail, vec![TokenKind::IntegerLiteral, TokenKind::Unknown]);
    assert!(!analysis.syntax_valid);
}

#[test]
fn hombro_range_enforcement() {
    let over = analyze("Robot r1\nr1.hombro = 200").unwrap();
    assert_eq!(over.errors.len(), 1);
    assert!(over.quadruples().is_empty());

    let boundary = analyze("Robot r1\nr1.hombro = 180").unwrap();
    assert!(boundary.errors.is_empty());
    assert_eq!(boundary.warnings.len(), 1);
    assert!(!boundary.quadruples().is_empty());

    let inside = analyze("Robot r1\nr1.hombro = 90").unwrap();
    assert!(inside.errors.is_empty());
    assert!(inside.warnings.is_empty());
}

#[test]
fn loop_lowering() {
    let analysis = analyze("Robot r1\nr1.repetir = 2\nr1.inicio\nr1.base = 90\nr1.fin").unwrap();
    assert!(analysis.errors.is_empty(), "{:?}", analysis.errors);
    let quads = analysis.quadruples();

    let counter_inits: Vec<_> = quads
        .iter()
        .filter(|q| q.op == OpCode::Asig)
        .filter(|q| matches!(&q.result, Some(Operand::Name(n)) if n.starts_with("CX")))
        .collect();
    assert_eq!(counter_inits.len(), 1);
    assert_eq!(counter_inits[0].arg1, Some(Operand::Number(2.0)));
    let counter = counter_inits[0].result.clone();

    let head = quads
        .iter()
        .position(|q| q.op == OpCode::DeclararEtiqueta)
        .unwrap();
    let call = quads.iter().position(|q| q.op == OpCode::Call).unwrap();
    assert!(head < call);
    let loop_label = quads[head].result.clone();

    assert_eq!(count_ops(quads, OpCode::Call), 1);
    assert_eq!(count_ops(quads, OpCode::Decremento), 1);
    assert_eq!(count_ops(quads, OpCode::Comparar), 1);
    assert_eq!(count_ops(quads, OpCode::SaltoCondicional), 1);

    let dec = quads.iter().find(|q| q.op == OpCode::Decremento).unwrap();
    assert_eq!(dec.arg1, counter);
    let jump = quads
        .iter()
        .find(|q| q.op == OpCode::SaltoCondicional)
        .unwrap();
    assert_eq!(jump.result, loop_label);
    assert_eq!(quads.last().map(|q| q.op), Some(OpCode::Fin));
}

#[test]
fn idempotent() {
    let source = "Robot r1\nr1.repetir = 3\nr1.inicio\nr1.garra = 90\nr1.espera = 1\nr1.fin\n\
                  Robot r2\nr2.codo = 200";
    let first = analyze(source).unwrap();
    let second = analyze(source).unwrap();

    assert_eq!(first.tokens, second.tokens);
    assert_eq!(first.errors, second.errors);
    assert_eq!(first.warnings, second.warnings);
    assert_eq!(first.symbol_table, second.symbol_table);
    assert_eq!(first.quadruples, second.quadruples);
    assert_eq!(first.formatted_report(), second.formatted_report());
}

#[test]
fn lexer_totality() {
    for source in ["", "@#$", "\n\n\t", "Robot r1\nr1.base = 9@0", "¿ñ?"] {
        let (tokens, _) = Lexer::tokenize(source);
        let emitted: usize = tokens.iter().map(|t| t.value.chars().count()).sum();
        let skipped = source.chars().filter(|c| c.is_whitespace()).count();
        let comment = source.find('#').map_or(0, |i| source[i..].chars().count());
        assert_eq!(emitted + skipped + comment, source.chars().count(), "{source:?}");
    }
}

#[test]
fn report_hides_tables_on_error() {
    let report = analyze("Robot r1\nr1.garra = 120").unwrap().formatted_report();
    assert!(report.contains("=== ERRORS ==="));
    assert!(!report.contains("=== SYMBOL TABLE ==="));
    assert!(!report.contains("=== QUADRUPLES ==="));
}

#[test]
fn report_sections_in_order() {
    let report = analyze("Robot r1\nr1.base = 0\nr1.codo = 45")
        .unwrap()
        .formatted_report();

    let tokens = report.find("=== TOKENS ===").unwrap();
    let symbols = report.find("=== SYMBOL TABLE ===").unwrap();
    let quads = report.find("=== QUADRUPLES ===").unwrap();
    let warnings = report.find("=== WARNINGS ===").unwrap();
    assert!(tokens < symbols && symbols < quads && quads < warnings);
    assert!(report.contains("| r1     | DECLARACION | -         | -     |"));
    assert!(report.contains("DECLARAR"));
}

#[test]
fn empty_source() {
    for source in ["", "  \n# nothing here\n"] {
        let analysis = analyze(source).unwrap();
        assert!(analysis.tokens.is_empty());
        assert_eq!(analysis.errors.len(), 1);
        assert_eq!(analysis.errors[0].phase, Phase::Syntax);
        assert!(analysis.errors[0].message.contains("no code to analyze"));
        assert!(analysis.warnings.is_empty());
        assert!(!analysis.syntax_valid);
        assert!(!analysis.is_success());
        assert!(analysis.quadruples().is_empty());
    }

    let report = analyze("").unwrap().formatted_report();
    assert!(report.contains("semantic analysis: NOT RUN"));
    assert!(report.contains("=== ERRORS ==="));
}

#[test]
fn semantic_checks_survive_syntax_error() {
    let analysis = analyze("Robot r1\nRobot r1\nr1.base = 200\nr1 codo = 5").unwrap();

    assert!(!analysis.syntax_valid);
    assert!(analysis.semantic_checked);
    assert!(!analysis.semantic_valid);
    let phases: Vec<_> = analysis.errors.iter().map(|e| e.phase).collect();
    assert_eq!(phases, vec![Phase::Syntax, Phase::Semantic, Phase::Semantic]);
    assert!(analysis.errors[1].message.contains("'r1' declared more than once"));
    assert!(analysis.errors[2].message.contains("out of valid range [0, 360]"));
    assert!(analysis.quadruples().is_empty());

    let report = analysis.formatted_report();
    assert!(report.contains("syntax analysis:   ERRORS FOUND"));
    assert!(report.contains("semantic analysis: ERRORS FOUND"));
    assert!(report.contains("syntax error at line 4, column 4: expected '.'"));
}

#[test]
fn comments_and_case() {
    let source = "# arm demo\nROBOT arm // main robot\n/* start\n   position */\narm.BASE = 45.5";
    let analysis = analyze(source).unwrap();
    assert!(analysis.errors.is_empty(), "{:?}", analysis.errors);
    assert_eq!(analysis.program.assignments[0].line, 5);
    assert_eq!(analysis.symbol_table()[1].value, Some(45));
}

#[test]
fn interleaved_robots() {
    let source = "Robot r1\nRobot r2\nr1.base = 90\nr2.hombro = 45\nr1.espera = 1";
    let analysis = analyze(source).unwrap();
    assert!(analysis.errors.is_empty(), "{:?}", analysis.errors);
    let declared: Vec<_> = analysis
        .quadruples()
        .iter()
        .filter(|q| q.op == OpCode::Declarar)
        .filter_map(|q| q.result.clone())
        .collect();
    assert_eq!(declared, vec![Operand::name("r1"), Operand::name("r2")]);
}

#[test]
fn json_output() {
    let analysis = analyze("Robot r1\nr1.base = 90").unwrap();
    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["quadruples"][0]["op"], "DECLARAR");
    assert_eq!(json["tokens"][0]["kind"], "KEYWORD");
    assert_eq!(json["symbol_table"][1]["value"], 90);
}
