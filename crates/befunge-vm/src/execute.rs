//! VM execution loop.
//!
//! One instruction cycle fetches the character under the cursor, applies
//! its transition to the machine state, then advances the cursor one cell
//! (`@` excepted, which stops the loop in place). In string mode every
//! character except `"` is pushed as its code point instead of executed.
//!
//! Division and modulo truncate toward zero, so the remainder takes the
//! sign of the dividend; a zero divisor yields 0 for both. Arithmetic
//! wraps on overflow.

use std::io::Write;

use rand::Rng;
use tracing::{debug, trace};

use crate::cursor::Direction;
use crate::error::RuntimeError;
use crate::input::InputStream;
use crate::machine::Interp;
use crate::playfield::Playfield;

/// Outcome of program execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// The program reached `@`.
    Halted,
    /// The step cap ran out before the program halted. A safety valve,
    /// not an error.
    StepLimit,
}

/// Control flow after one instruction cycle.
enum Flow {
    Continue,
    Halt,
}

/// Run a program to completion.
///
/// Executes at most `interp.step_cap()` instruction cycles. Input is read
/// from `input`, output written (and flushed per write) to `output`, and
/// the `?` instruction draws its direction from `rng`.
pub fn execute<W, R>(
    interp: &mut Interp,
    input: &mut InputStream,
    output: &mut W,
    rng: &mut R,
) -> Result<ExecuteOutcome, RuntimeError>
where
    W: Write,
    R: Rng,
{
    loop {
        if interp.steps >= interp.step_cap {
            debug!(steps = interp.steps, "step cap exhausted, stopping run");
            return Ok(ExecuteOutcome::StepLimit);
        }
        interp.steps += 1;

        let ch = interp.playfield.get(interp.cursor.x(), interp.cursor.y());
        match transition(interp, ch, input, output, rng)? {
            Flow::Halt => {
                trace!(steps = interp.steps, "program halted");
                return Ok(ExecuteOutcome::Halted);
            }
            Flow::Continue => interp.cursor.advance(),
        }
    }
}

/// Apply one character's effect to the machine state.
///
/// Does not perform the cycle's trailing cursor advance; `execute` does
/// that for every instruction except `@`.
fn transition<W, R>(
    interp: &mut Interp,
    ch: char,
    input: &mut InputStream,
    output: &mut W,
    rng: &mut R,
) -> Result<Flow, RuntimeError>
where
    W: Write,
    R: Rng,
{
    if interp.string_mode && ch != '"' {
        interp.stack.push(ch as i64);
        return Ok(Flow::Continue);
    }

    match ch {
        '0'..='9' => interp.stack.push(ch as i64 - '0' as i64),
        '+' => binary(interp, |b, a| b.wrapping_add(a)),
        '-' => binary(interp, |b, a| b.wrapping_sub(a)),
        '*' => binary(interp, |b, a| b.wrapping_mul(a)),
        '/' => binary(interp, |b, a| if a == 0 { 0 } else { b.wrapping_div(a) }),
        '%' => binary(interp, |b, a| if a == 0 { 0 } else { b.wrapping_rem(a) }),
        '!' => {
            let a = interp.stack.pop();
            interp.stack.push((a == 0) as i64);
        }
        '`' => binary(interp, |b, a| (b > a) as i64),
        '>' => interp.cursor.face(Direction::East),
        '<' => interp.cursor.face(Direction::West),
        '^' => interp.cursor.face(Direction::North),
        'v' => interp.cursor.face(Direction::South),
        '?' => interp.cursor.face(rng.gen()),
        '_' => {
            let a = interp.stack.pop();
            interp.cursor.face(if a == 0 {
                Direction::East
            } else {
                Direction::West
            });
        }
        '|' => {
            let a = interp.stack.pop();
            interp.cursor.face(if a == 0 {
                Direction::South
            } else {
                Direction::North
            });
        }
        '"' => interp.string_mode = !interp.string_mode,
        ':' => interp.stack.dup(),
        '\\' => interp.stack.swap(),
        '$' => {
            interp.stack.pop();
        }
        '.' => {
            let a = interp.stack.pop();
            write!(output, "{} ", a)?;
            output.flush()?;
        }
        ',' => {
            let a = interp.stack.pop();
            write!(output, "{}", char::from(a.rem_euclid(256) as u8))?;
            output.flush()?;
        }
        '#' => interp.cursor.advance(),
        'g' => {
            let x = interp.stack.pop();
            let y = interp.stack.pop();
            let value = if Playfield::in_bounds(x, y) {
                interp.playfield.get(x as usize, y as usize) as i64
            } else {
                0
            };
            interp.stack.push(value);
        }
        'p' => {
            let x = interp.stack.pop();
            let y = interp.stack.pop();
            let v = interp.stack.pop();
            if Playfield::in_bounds(x, y) {
                let cell = char::from(v.rem_euclid(256) as u8);
                interp.playfield.put(x as usize, y as usize, cell);
            }
        }
        '&' => {
            let value = input.read_int_token().unwrap_or(-1);
            interp.stack.push(value);
        }
        '~' => {
            let value = input.read_byte().map(i64::from).unwrap_or(-1);
            interp.stack.push(value);
        }
        '@' => return Ok(Flow::Halt),
        // Space and every unrecognized character are no-ops.
        _ => {}
    }

    Ok(Flow::Continue)
}

/// Pop the right operand, then the left, and push `op(left, right)`.
fn binary(interp: &mut Interp, op: impl FnOnce(i64, i64) -> i64) {
    let a = interp.stack.pop();
    let b = interp.stack.pop();
    interp.stack.push(op(b, a));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn interp() -> Interp {
        Interp::new(Playfield::parse(""))
    }

    /// Apply a single instruction with empty input and discarded output.
    fn apply(interp: &mut Interp, ch: char) {
        let mut input = InputStream::empty();
        let mut output = Vec::new();
        let mut rng = StdRng::seed_from_u64(0);
        transition(interp, ch, &mut input, &mut output, &mut rng).unwrap();
    }

    /// Apply a single instruction and capture what it wrote.
    fn apply_capture(interp: &mut Interp, ch: char) -> String {
        let mut input = InputStream::empty();
        let mut output = Vec::new();
        let mut rng = StdRng::seed_from_u64(0);
        transition(interp, ch, &mut input, &mut output, &mut rng).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn run_program(source: &str) -> (Interp, String, ExecuteOutcome) {
        let mut interp = Interp::new(Playfield::parse(source));
        let mut input = InputStream::empty();
        let mut output = Vec::new();
        let mut rng = StdRng::seed_from_u64(0);
        let outcome = execute(&mut interp, &mut input, &mut output, &mut rng).unwrap();
        (interp, String::from_utf8(output).unwrap(), outcome)
    }

    #[test]
    fn digits_push_their_value() {
        let mut m = interp();
        for (i, ch) in ('0'..='9').enumerate() {
            apply(&mut m, ch);
            assert_eq!(m.stack().as_slice().last(), Some(&(i as i64)));
        }
    }

    #[test]
    fn subtraction_pops_right_operand_first() {
        let mut m = interp();
        m.stack.push(5);
        m.stack.push(2);
        apply(&mut m, '-');
        assert_eq!(m.stack().as_slice(), &[3]);
    }

    #[test]
    fn division_by_zero_yields_zero() {
        let mut m = interp();
        m.stack.push(8);
        m.stack.push(0);
        apply(&mut m, '/');
        assert_eq!(m.stack().as_slice(), &[0]);
    }

    #[test]
    fn modulo_by_zero_yields_zero() {
        let mut m = interp();
        m.stack.push(8);
        m.stack.push(0);
        apply(&mut m, '%');
        assert_eq!(m.stack().as_slice(), &[0]);
    }

    #[test]
    fn division_truncates_toward_zero() {
        let mut m = interp();
        m.stack.push(-7);
        m.stack.push(2);
        apply(&mut m, '/');
        assert_eq!(m.stack().as_slice(), &[-3]);
    }

    #[test]
    fn remainder_takes_dividend_sign() {
        let mut m = interp();
        m.stack.push(-7);
        m.stack.push(2);
        apply(&mut m, '%');
        assert_eq!(m.stack().as_slice(), &[-1]);
    }

    #[test]
    fn arithmetic_wraps_at_extremes() {
        let mut m = interp();
        m.stack.push(i64::MAX);
        m.stack.push(1);
        apply(&mut m, '+');
        assert_eq!(m.stack().as_slice(), &[i64::MIN]);

        let mut m = interp();
        m.stack.push(i64::MIN);
        m.stack.push(-1);
        apply(&mut m, '/');
        assert_eq!(m.stack().as_slice(), &[i64::MIN]);
    }

    #[test]
    fn logical_not() {
        let mut m = interp();
        m.stack.push(0);
        apply(&mut m, '!');
        assert_eq!(m.stack.pop(), 1);

        m.stack.push(17);
        apply(&mut m, '!');
        assert_eq!(m.stack.pop(), 0);
    }

    #[test]
    fn greater_than() {
        let mut m = interp();
        m.stack.push(3);
        m.stack.push(2);
        apply(&mut m, '`');
        assert_eq!(m.stack.pop(), 1);

        m.stack.push(2);
        m.stack.push(3);
        apply(&mut m, '`');
        assert_eq!(m.stack.pop(), 0);
    }

    #[test]
    fn direction_instructions() {
        for (ch, dir) in [
            ('>', Direction::East),
            ('<', Direction::West),
            ('^', Direction::North),
            ('v', Direction::South),
        ] {
            let mut m = interp();
            apply(&mut m, ch);
            assert_eq!(m.cursor().dir(), dir, "instruction {:?}", ch);
        }
    }

    #[test]
    fn horizontal_branch() {
        let mut m = interp();
        m.stack.push(0);
        apply(&mut m, '_');
        assert_eq!(m.cursor().dir(), Direction::East);

        m.stack.push(-5);
        apply(&mut m, '_');
        assert_eq!(m.cursor().dir(), Direction::West);

        // Empty stack pops 0.
        let mut m = interp();
        apply(&mut m, '_');
        assert_eq!(m.cursor().dir(), Direction::East);
    }

    #[test]
    fn vertical_branch() {
        let mut m = interp();
        m.stack.push(0);
        apply(&mut m, '|');
        assert_eq!(m.cursor().dir(), Direction::South);

        m.stack.push(1);
        apply(&mut m, '|');
        assert_eq!(m.cursor().dir(), Direction::North);
    }

    #[test]
    fn random_direction_is_deterministic_per_seed() {
        let dirs: Vec<Direction> = (0..2)
            .map(|_| {
                let mut m = interp();
                let mut input = InputStream::empty();
                let mut output = Vec::new();
                let mut rng = StdRng::seed_from_u64(9);
                transition(&mut m, '?', &mut input, &mut output, &mut rng).unwrap();
                m.cursor().dir()
            })
            .collect();
        assert_eq!(dirs[0], dirs[1]);
    }

    #[test]
    fn string_mode_pushes_code_points() {
        let mut m = interp();
        apply(&mut m, '"');
        assert!(m.string_mode());

        // Instructions lose their meaning inside a string literal.
        apply(&mut m, '+');
        apply(&mut m, 'A');
        assert_eq!(m.stack().as_slice(), &['+' as i64, 'A' as i64]);

        // The closing quote contributes nothing.
        apply(&mut m, '"');
        assert!(!m.string_mode());
        assert_eq!(m.stack().as_slice(), &['+' as i64, 'A' as i64]);
    }

    #[test]
    fn discard_on_empty_stack_is_noop() {
        let mut m = interp();
        apply(&mut m, '$');
        assert!(m.stack().is_empty());
    }

    #[test]
    fn print_integer_appends_space() {
        let mut m = interp();
        m.stack.push(42);
        assert_eq!(apply_capture(&mut m, '.'), "42 ");

        m.stack.push(-7);
        assert_eq!(apply_capture(&mut m, '.'), "-7 ");
    }

    #[test]
    fn print_char_masks_low_byte() {
        let mut m = interp();
        m.stack.push(65);
        assert_eq!(apply_capture(&mut m, ','), "A");

        // 321 = 256 + 65.
        m.stack.push(321);
        assert_eq!(apply_capture(&mut m, ','), "A");

        // Negative values mask to a nonnegative byte: -191 = -256 + 65.
        m.stack.push(-191);
        assert_eq!(apply_capture(&mut m, ','), "A");
    }

    #[test]
    fn get_out_of_bounds_pushes_zero() {
        let mut m = interp();
        m.stack.push(5); // y
        m.stack.push(999); // x
        apply(&mut m, 'g');
        assert_eq!(m.stack().as_slice(), &[0]);
    }

    #[test]
    fn put_then_get_round_trips_mod_256() {
        let mut m = interp();
        m.stack.push(65 + 256); // v
        m.stack.push(4); // y
        m.stack.push(3); // x
        apply(&mut m, 'p');
        assert_eq!(m.playfield().get(3, 4), 'A');

        m.stack.push(4); // y
        m.stack.push(3); // x
        apply(&mut m, 'g');
        assert_eq!(m.stack().as_slice(), &[65]);
    }

    #[test]
    fn put_out_of_bounds_is_dropped() {
        let mut m = interp();
        m.stack.push(65); // v
        m.stack.push(30); // y, past the bottom edge
        m.stack.push(0); // x
        apply(&mut m, 'p');

        // The grid is unchanged and reading the same coordinate yields 0.
        m.stack.push(30);
        m.stack.push(0);
        apply(&mut m, 'g');
        assert_eq!(m.stack().as_slice(), &[0]);
    }

    #[test]
    fn exhausted_input_pushes_sentinels() {
        let mut m = interp();
        apply(&mut m, '&');
        apply(&mut m, '~');
        assert_eq!(m.stack().as_slice(), &[-1, -1]);
    }

    #[test]
    fn unknown_characters_are_noops() {
        let mut m = interp();
        m.stack.push(7);
        for ch in ['q', 'Z', '(', '{', '=', '\u{00e9}'] {
            apply(&mut m, ch);
        }
        assert_eq!(m.stack().as_slice(), &[7]);
        assert_eq!(m.cursor().dir(), Direction::East);
    }

    #[test]
    fn halt_stops_the_loop_in_place() {
        let (m, out, outcome) = run_program("@");
        assert_eq!(outcome, ExecuteOutcome::Halted);
        assert_eq!(out, "");
        assert_eq!(m.steps(), 1);
        assert_eq!((m.cursor().x(), m.cursor().y()), (0, 0));
    }

    #[test]
    fn step_cap_stops_nonterminating_program() {
        let mut m = Interp::with_step_cap(Playfield::parse(">"), 5);
        let mut input = InputStream::empty();
        let mut output = Vec::new();
        let mut rng = StdRng::seed_from_u64(0);
        let outcome = execute(&mut m, &mut input, &mut output, &mut rng).unwrap();
        assert_eq!(outcome, ExecuteOutcome::StepLimit);
        assert_eq!(m.steps(), 5);
    }

    #[test]
    fn bridge_skips_exactly_one_cell() {
        // `#` jumps the `@` and lands on `.`, printing before the halt.
        let (_, out, outcome) = run_program("12#@.@");
        assert_eq!(outcome, ExecuteOutcome::Halted);
        assert_eq!(out, "2 ");
    }

    #[test]
    fn output_fails_surface_as_runtime_error() {
        struct Refuse;
        impl Write for Refuse {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut m = Interp::new(Playfield::parse("1.@"));
        let mut input = InputStream::empty();
        let mut rng = StdRng::seed_from_u64(0);
        let result = execute(&mut m, &mut input, &mut Refuse, &mut rng);
        assert!(matches!(result, Err(RuntimeError::Output(_))));
    }
}
