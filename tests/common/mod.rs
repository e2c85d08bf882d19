/// Runs a snippet through a fresh interpreter and asserts the exact output
/// on the sink.
#[macro_export]
macro_rules! eval_ok {
    ($source:expr, $expected:expr) => {{
        let mut output = Vec::new();
        let ok = itmoscript_lang::interpret($source, &mut output);
        let output = String::from_utf8(output).expect("interpreter output to be UTF-8");

        assert!(ok, "expected a clean run, sink holds: {output:?}");
        assert_eq!(output, $expected);
    }};
}

/// Runs a snippet expecting a failure and asserts that the diagnostic on the
/// sink contains the given message.
#[macro_export]
macro_rules! eval_err {
    ($source:expr, $expected:expr) => {{
        let mut output = Vec::new();
        let ok = itmoscript_lang::interpret($source, &mut output);
        let output = String::from_utf8(output).expect("interpreter output to be UTF-8");

        assert!(!ok, "expected a failure, sink holds: {output:?}");
        assert!(output.contains("Error: "), "no diagnostic in: {output:?}");
        assert!(
            output.contains($expected),
            "diagnostic {output:?} does not mention {:?}",
            $expected,
        );
    }};
}
