// This is a part of rust-encoding.
// Copyright (c) 2013-2015, Kang Seonghoon.
// See README.md and LICENSE.txt for details.

//! Macros and utilities for testing.

/// Feeds `processed ++ unprocessed` and expects the converter to stop with `Underflow`
/// right after `processed`, having written `output`.
macro_rules! assert_feed_ok {
    ($this:expr, $processed:expr, $unprocessed:expr, $output:expr) => ({
        let processed = &$processed[..];
        let unprocessed = &$unprocessed[..];
        let output = &$output[..];
        let input = $this.test_concat(processed, unprocessed);
        let (result, nprocessed, buf) = $this.test_feed(&input);
        let expected = $this.test_len(processed);
        assert!(result == $crate::types::CoderResult::Underflow && nprocessed == expected,
                "raw_feed should return {:?}, but instead returned {:?}",
                ($crate::types::CoderResult::Underflow, expected), (result, nprocessed));
        assert!(output == &buf[..],
                "raw_feed should push {:?}, but instead pushed {:?}", output, &buf[..]);
    })
}

/// Feeds `processed ++ problem ++ remaining` and expects the converter to stop
/// at the start of `problem` with an error of its length, having written `output`.
macro_rules! assert_feed_err {
    ($this:expr, $processed:expr, $problem:expr, $remaining:expr, $output:expr) => ({
        let processed = &$processed[..];
        let problem = &$problem[..];
        let remaining = &$remaining[..];
        let output = &$output[..];
        let input = $this.test_concat(processed, problem);
        let input = $this.test_concat(&input, remaining);
        let (result, nprocessed, buf) = $this.test_feed(&input);
        let expected = ($this.test_len(processed), Some($this.test_len(problem)));
        assert!(result.is_error() && (nprocessed, result.length()) == expected,
                "raw_feed should return an error at {:?}, but instead returned {:?}",
                expected, (result, nprocessed));
        assert!(output == &buf[..],
                "raw_feed should push {:?}, but instead pushed {:?}", output, &buf[..]);
    })
}

/// Expects the encoder to return to the initial state by writing `output`.
macro_rules! assert_finish_ok {
    ($this:expr, $output:expr) => ({
        let output = &$output[..];
        let (result, buf) = $this.test_finish();
        assert!(result == $crate::types::CoderResult::Underflow,
                "raw_finish should return Underflow, but instead returned {:?}", result);
        assert!(output == &buf[..],
                "raw_finish should push {:?}, but instead pushed {:?}", output, &buf[..]);
    })
}

/// Feeds `processed ++ problem` as the last input and expects the decoder to report
/// the truncated `problem` as an error, having written `output`.
macro_rules! assert_finish_err {
    ($this:expr, $processed:expr, $problem:expr, $output:expr) => ({
        let processed = &$processed[..];
        let problem = &$problem[..];
        let output = &$output[..];
        let input = $this.test_concat(processed, problem);
        let (result, nprocessed, buf) = $this.test_feed_last(&input);
        let expected = ($this.test_len(processed), Some($this.test_len(problem)));
        assert!(result.is_error() && (nprocessed, result.length()) == expected,
                "raw_feed should return an error at {:?}, but instead returned {:?}",
                expected, (result, nprocessed));
        assert!(output == &buf[..],
                "raw_feed should push {:?}, but instead pushed {:?}", output, &buf[..]);
    })
}

/// Japanese text sample, shared by the round-trip tests.
pub static JAPANESE_TEXT: &'static str =
    "\u{65e5}\u{672c}\u{8a9e}\u{ff08}\u{306b}\u{307b}\u{3093}\u{3054}\u{3001}\
     \u{306b}\u{3063}\u{307d}\u{3093}\u{3054}\u{ff09}\u{3068}\u{306f}\u{3001}\
     \u{4e3b}\u{306b}\u{65e5}\u{672c}\u{56fd}\u{5185}\u{3084}\u{65e5}\u{672c}\
     \u{4eba}\u{540c}\u{58eb}\u{306e}\u{9593}\u{3067}\u{4f7f}\u{308f}\u{308c}\
     \u{3066}\u{3044}\u{308b}\u{8a00}\u{8a9e}\u{3067}\u{3042}\u{308b}\u{3002}\n\
     \u{65e5}\u{672c}\u{306f}\u{6cd5}\u{4ee4}\u{306b}\u{3088}\u{3063}\u{3066}\
     \u{300c}\u{516c}\u{7528}\u{8a9e}\u{300d}\u{3092}\u{898f}\u{5b9a}\u{3057}\
     \u{3066}\u{3044}\u{306a}\u{3044}\u{304c}\u{3001}1954 Tokyo.\r\n";
