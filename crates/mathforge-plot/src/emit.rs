//! Native draw-directive emission
//!
//! Emits one draw directive per interval for expressions the native vector
//! renderer can evaluate itself. This is a pure formatting step; no numeric
//! evaluation happens here — the renderer samples the algebraic expression
//! at draw time, which keeps the payload small and resolution-independent.

use crate::partition::Interval;

/// One draw directive per interval, carrying the sub-domain bounds, the
/// sample budget, and the algebraic expression string
pub fn emit_directives(expr_str: &str, intervals: &[Interval]) -> Vec<String> {
    intervals
        .iter()
        .map(|iv| {
            format!(
                "\\addplot[domain={}:{}, samples={}] {{{}}};",
                iv.lo, iv.hi, iv.samples, expr_str
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_directive_per_interval() {
        let ivs = vec![
            Interval {
                lo: -5.0,
                hi: -0.05,
                samples: 50,
            },
            Interval {
                lo: 0.05,
                hi: 5.0,
                samples: 50,
            },
        ];
        let frags = emit_directives("x^(-1)", &ivs);
        assert_eq!(frags.len(), 2);
        assert_eq!(frags[0], "\\addplot[domain=-5:-0.05, samples=50] {x^(-1)};");
        assert_eq!(frags[1], "\\addplot[domain=0.05:5, samples=50] {x^(-1)};");
    }

    #[test]
    fn test_emission_is_deterministic() {
        let ivs = vec![Interval {
            lo: 0.0,
            hi: 1.0,
            samples: 100,
        }];
        assert_eq!(emit_directives("sin(x)", &ivs), emit_directives("sin(x)", &ivs));
    }
}
