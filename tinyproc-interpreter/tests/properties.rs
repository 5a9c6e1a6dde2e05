use tinyproc_core::lexer::Tokenizer;
use tinyproc_core::parser::Parser;
use tinyproc_interpreter::context::Context;
use tinyproc_interpreter::error::{Error, RuntimeError, Severity};
use tinyproc_interpreter::evaluator::Evaluator;
use tinyproc_interpreter::io::LineSource;

const SAMPLES: [i64; 9] = [-1000, -17, -1, 0, 1, 2, 5, 17, 123456];

/// Runs a single-block program, returning what it wrote and its final frame.
fn execute(source: &str) -> (Result<Context, RuntimeError>, String) {
    let mut parser = Parser::new(Tokenizer::new(source));
    let program = parser.parse_program().unwrap();
    assert_eq!(program.blocks.len(), 1, "{source}");

    let mut input = LineSource::new("".as_bytes());
    let mut output = Vec::new();
    let result = Evaluator::new(&mut input, &mut output).run_block(&program.blocks[0]);

    (result, String::from_utf8(output).unwrap())
}

fn written(source: &str) -> String {
    let (result, output) = execute(source);
    if let Err(err) = result {
        panic!("{source}: {err}");
    }
    output
}

/// The language has no negative literals, so `-n` is spelled `0 - n`.
fn literal(value: i64) -> String {
    if value < 0 {
        format!("(0 - {})", -value)
    } else {
        value.to_string()
    }
}

#[test]
fn arithmetic_matches_host_integers() {
    for a in SAMPLES {
        for b in SAMPLES {
            let (a_lit, b_lit) = (literal(a), literal(b));
            let output = written(&format!(
                "begin write({a_lit} + {b_lit}); write({a_lit} - {b_lit}); write({a_lit} * {b_lit}) end"
            ));

            assert_eq!(output, format!("{}\n{}\n{}\n", a + b, a - b, a * b));
        }
    }
}

#[test]
fn comparisons_are_consistent() {
    for a in SAMPLES {
        for b in SAMPLES {
            let (a_lit, b_lit) = (literal(a), literal(b));
            let output = written(&format!(
                "begin
                    write({a_lit} < {b_lit}); write({a_lit} > {b_lit});
                    write({a_lit} <= {b_lit}); write({a_lit} >= {b_lit});
                    write({a_lit} = {b_lit}); write({a_lit} <> {b_lit})
                end"
            ));
            let values: Vec<i64> = output.lines().map(|line| line.parse().unwrap()).collect();
            let [lt, gt, le, ge, eq, ne] = values[..] else {
                panic!("unexpected output {output:?}");
            };

            assert!(values.iter().all(|value| *value == 0 || *value == 1));
            assert_eq!(le, i64::from(lt == 1 || eq == 1));
            assert_eq!(ge, i64::from(gt == 1 || eq == 1));
            assert_eq!(ne, 1 - eq);
            assert_eq!(lt, i64::from(a < b));
            assert_eq!(eq, i64::from(a == b));
        }
    }
}

#[test]
fn overflow_is_reported() {
    let (result, _) = execute("begin write(9223372036854775807 * 2) end");

    assert!(matches!(result, Err(RuntimeError::Overflow { .. })));
}

#[test]
fn assignment_is_an_expression() {
    let (result, output) =
        execute("begin integer x; integer y; write(x := (y := 5)) end");
    let context = result.unwrap();

    assert_eq!(output, "5\n");
    assert_eq!(context.variable("x"), Some(5));
    assert_eq!(context.variable("y"), Some(5));
}

#[test]
fn unassigned_variables_read_as_zero() {
    let (result, output) = execute("begin write(v); write(v); v; write(v) end");

    assert_eq!(output, "0\n0\n0\n");
    assert_eq!(result.unwrap().variable("v"), Some(0));
}

#[test]
fn default_return_value() {
    assert_eq!(written("begin function f(); begin end; write(f()) end"), "0\n");
}

#[test]
fn return_by_self_assignment() {
    assert_eq!(
        written("begin function f(n); begin f := n * 2 end; write(f(21)) end"),
        "42\n"
    );
}

#[test]
fn recursion_releases_frames() {
    let (result, output) = execute(
        "begin
            function fact(n);
            begin
                integer k;
                k := n;
                if n <= 1 then fact := 1 else fact := n * fact(n - 1)
            end;
            integer n;
            n := 5;
            write(fact(n));
            write(n)
        end",
    );
    let context = result.unwrap();

    assert_eq!(output, "120\n5\n");
    assert_eq!(context.variable("k"), None);
    assert!(context.child().is_none());
}

#[test]
fn wrong_argument_count_is_fatal() {
    let (result, output) = execute(
        "begin function f(n); begin f := n end; write(1); write(f(1, 2)); write(2) end",
    );
    let err = result.unwrap_err();

    assert_eq!(output, "1\n");
    assert_eq!(
        err.to_string(),
        "function `f` expects 1 arguments, got 2"
    );
    assert_eq!(Error::from(err).severity(), Severity::Fatal);
}

#[test]
fn sequencing() {
    assert_eq!(
        written("begin integer a; integer b; a:=1; b:=2; write(a+b) end"),
        "3\n"
    );
    assert_eq!(written("begin integer a; a:=1; write(a); end"), "1\n");

    let (result, output) = execute("begin a:=1; b:=2; write(a+b) end");
    assert_eq!(result.unwrap_err(), RuntimeError::UndeclaredVariable("a".into()));
    assert_eq!(output, "");
}

#[test]
fn conditionals() {
    assert_eq!(
        written("begin if 3>2 then write(1) else write(2) end"),
        "1\n"
    );
    assert_eq!(
        written("begin if 1=2 then write(1) else write(2) end"),
        "2\n"
    );
}

#[test]
fn long_blocks_run() {
    let statements = "a := a + 1; ".repeat(10_000);

    assert_eq!(
        written(&format!("begin integer a; {statements}write(a) end")),
        "10000\n"
    );
}

#[test]
fn deep_expressions_run() {
    let depth = 20_000;
    let grouped = format!("{}5{}", "(".repeat(depth), ")".repeat(depth));
    let chained = format!("0{}", " + 1".repeat(depth));

    assert_eq!(
        written(&format!("begin write({grouped}); write({chained}) end")),
        format!("5\n{depth}\n")
    );
}
