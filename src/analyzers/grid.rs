//! Bracketed grids: `[A][B] / [C][?]` and 3×3 matrices
//!
//! Cells are written in square brackets, row by row, and the last cell
//! is the gap. A 2×2 grid is either a rotation (arrows, half disks) or
//! numeric with `d = b + c − a`. A 3×3 grid is solved by row sums, row
//! steps, column steps or as a Latin square, in that order.

use super::symbolic::{normalize_glyph, ROTATION_CYCLES};
use super::*;

static CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\s*([^\[\]]+?)\s*\]").expect("grid cell pattern"));

/// A square grid whose last cell is missing
#[derive(Debug, Clone, PartialEq)]
struct Grid {
    size: usize,
    /// Known cells, row-major; `size * size - 1` entries
    known: Vec<String>,
}

impl Grid {
    fn parse(rule: RuleType, text: &str) -> Result<Self, RuleError> {
        let cells: Vec<String> = CELL
            .captures_iter(text)
            .map(|c| c[1].chars().map(normalize_glyph).collect())
            .collect();

        let size = match cells.len() {
            4 => 2,
            9 => 3,
            0 => return Err(RuleError::extraction(rule, "no bracketed cells")),
            n => {
                return Err(RuleError::extraction(
                    rule,
                    format!("{} cells do not form a 2x2 or 3x3 grid", n),
                ))
            }
        };

        let gaps = cells.iter().filter(|c| c.as_str() == "?").count();
        if cells[cells.len() - 1] != "?" || gaps != 1 {
            return Err(RuleError::extraction(
                rule,
                "the last cell must be the only gap",
            ));
        }

        let mut known = cells;
        known.pop();
        Ok(Self { size, known })
    }

    fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.known.get(row * self.size + col).map(String::as_str)
    }

    fn row(&self, row: usize) -> Vec<&str> {
        (0..self.size).filter_map(|c| self.cell(row, c)).collect()
    }

    fn column(&self, col: usize) -> Vec<&str> {
        (0..self.size).filter_map(|r| self.cell(r, col)).collect()
    }

    /// Known cells as integers when every one of them is a number
    fn numbers(&self) -> Option<Vec<i64>> {
        self.known.iter().map(|c| c.parse::<i64>().ok()).collect()
    }

    fn sequence(&self) -> Vec<OptionValue> {
        self.known.iter().map(|c| OptionValue::parse(c)).collect()
    }
}

/// How a grid was solved
struct Solution {
    rule: &'static str,
    expected: Expected,
    confidence: f64,
}

enum Expected {
    Number(i64),
    Symbol(String),
}

impl Solution {
    fn number(rule: &'static str, n: i64, confidence: f64) -> Self {
        Self {
            rule,
            expected: Expected::Number(n),
            confidence,
        }
    }

    fn into_analysis(self, rule_type: RuleType, question: &Question, grid: &Grid) -> RuleAnalysis {
        let (expected_next, valid) = match self.expected {
            Expected::Number(n) => (OptionValue::integer(n), options_equal_to(question, n as f64)),
            Expected::Symbol(s) => {
                let valid = match s.parse::<i64>() {
                    Ok(n) => options_equal_to(question, n as f64),
                    Err(_) => matching_options(question, |o| {
                        o.text.trim().chars().map(normalize_glyph).collect::<String>() == s
                    }),
                };
                (OptionValue::parse(&s), valid)
            }
        };
        RuleAnalysis::new(rule_type, self.rule, expected_next, valid, self.confidence)
            .with_sequence(grid.sequence())
            .with_detail("size", format!("{0}x{0}", grid.size))
    }
}

/// `a b / c ?` where `a → b` is one clockwise quarter turn, applied to `c`
fn rotation_2x2(grid: &Grid) -> Option<Solution> {
    if grid.size != 2 {
        return None;
    }
    let glyphs: Vec<char> = grid
        .known
        .iter()
        .map(|c| {
            let mut chars = c.chars();
            match (chars.next(), chars.next()) {
                (Some(g), None) => Some(g),
                _ => None,
            }
        })
        .collect::<Option<_>>()?;
    let cycle = ROTATION_CYCLES
        .iter()
        .find(|cycle| glyphs.iter().all(|g| cycle.contains(g)))?;
    let position = |g: char| cycle.iter().position(|c| *c == g);

    let a = position(glyphs[0])?;
    let b = position(glyphs[1])?;
    let c = position(glyphs[2])?;
    if (a + 1) % 4 != b {
        return None;
    }
    Some(Solution {
        rule: "Rotation across rows and columns",
        expected: Expected::Symbol(cycle[(c + 1) % 4].to_string()),
        confidence: 0.9,
    })
}

/// `d = b + c − a`
fn additive_2x2(grid: &Grid) -> Option<Solution> {
    if grid.size != 2 {
        return None;
    }
    let n = grid.numbers()?;
    let d = n[1].checked_add(n[2])?.checked_sub(n[0])?;
    Some(Solution::number("Additive 2x2 matrix", d, 0.85))
}

fn row_sums_3x3(grid: &Grid) -> Option<Solution> {
    if grid.size != 3 {
        return None;
    }
    let n = grid.numbers()?;
    let first: i64 = n[0..3].iter().try_fold(0i64, |acc, v| acc.checked_add(*v))?;
    let second: i64 = n[3..6].iter().try_fold(0i64, |acc, v| acc.checked_add(*v))?;
    if first != second {
        return None;
    }
    let missing = first.checked_sub(n[6])?.checked_sub(n[7])?;
    Some(Solution::number("Constant row sum", missing, 0.85))
}

fn is_arithmetic(terms: &[i64]) -> bool {
    differences(terms).is_some_and(|d| d.windows(2).all(|w| w[0] == w[1]))
}

fn row_steps_3x3(grid: &Grid) -> Option<Solution> {
    if grid.size != 3 {
        return None;
    }
    let n = grid.numbers()?;
    if !is_arithmetic(&n[0..3]) || !is_arithmetic(&n[3..6]) {
        return None;
    }
    let missing = n[7].checked_mul(2)?.checked_sub(n[6])?;
    Some(Solution::number("Arithmetic rows", missing, 0.85))
}

fn column_steps_3x3(grid: &Grid) -> Option<Solution> {
    if grid.size != 3 {
        return None;
    }
    let n = grid.numbers()?;
    if !is_arithmetic(&[n[0], n[3], n[6]]) || !is_arithmetic(&[n[1], n[4], n[7]]) {
        return None;
    }
    let missing = n[5].checked_mul(2)?.checked_sub(n[2])?;
    Some(Solution::number("Arithmetic columns", missing, 0.85))
}

/// Every row and column holds each symbol exactly once
fn latin_square(grid: &Grid) -> Option<Solution> {
    let size = grid.size;
    let mut symbols = grid.row(0);
    symbols.sort_unstable();
    symbols.dedup();
    if symbols.len() != size {
        return None;
    }

    let distinct_within = |cells: &[&str]| {
        let mut sorted = cells.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        sorted.len() == cells.len() && cells.iter().all(|c| symbols.contains(c))
    };
    let rows_ok = (0..size).all(|r| distinct_within(&grid.row(r)));
    let cols_ok = (0..size).all(|c| distinct_within(&grid.column(c)));
    if !rows_ok || !cols_ok {
        return None;
    }

    let last_row = grid.row(size - 1);
    let last_col = grid.column(size - 1);
    let missing = symbols
        .iter()
        .find(|s| !last_row.contains(*s) && !last_col.contains(*s))?;
    Some(Solution {
        rule: "Latin square",
        expected: Expected::Symbol(missing.to_string()),
        confidence: 0.85,
    })
}

type Solver = fn(&Grid) -> Option<Solution>;

fn solve(
    rule: RuleType,
    question: &Question,
    solvers: &[Solver],
) -> Result<RuleAnalysis, RuleError> {
    let grid = Grid::parse(rule, &question.full_text())?;
    solvers
        .iter()
        .find_map(|solver| solver(&grid))
        .map(|solution| solution.into_analysis(rule, question, &grid))
        .ok_or_else(|| {
            RuleError::mismatch(
                rule,
                format!("no grid rule explains the {0}x{0} cells", grid.size),
            )
        })
}

/// Matrices: numeric or rotational relations between cells
pub struct Matrix;

impl RuleAnalyzer for Matrix {
    fn rule_type(&self) -> RuleType {
        RuleType::MatrixPattern
    }

    fn analyze(&self, question: &Question) -> Result<RuleAnalysis, RuleError> {
        solve(
            self.rule_type(),
            question,
            &[
                rotation_2x2,
                additive_2x2,
                row_sums_3x3,
                row_steps_3x3,
                column_steps_3x3,
                latin_square,
            ],
        )
    }
}

/// Grids to complete, Latin squares first
pub struct GridCompletion;

impl RuleAnalyzer for GridCompletion {
    fn rule_type(&self) -> RuleType {
        RuleType::GridCompletion
    }

    fn analyze(&self, question: &Question) -> Result<RuleAnalysis, RuleError> {
        solve(
            self.rule_type(),
            question,
            &[
                latin_square,
                rotation_2x2,
                additive_2x2,
                row_sums_3x3,
                row_steps_3x3,
                column_steps_3x3,
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn question(content: &str, options: &[&str]) -> Question {
        Question::new(content).with_options(options.iter().copied())
    }

    #[test]
    fn test_rotation_matrix() {
        let q = question("Matrice 2x2: [→][↓] / [↑][?]", &["←", "→", "↓", "↑"]);
        let a = Matrix.analyze(&q).unwrap();
        assert_eq!(a.expected_next, OptionValue::Symbol("→".into()));
        assert_eq!(a.valid_options, vec![1]);
        assert_eq!(a.confidence, 0.9);
    }

    #[test]
    fn test_rotation_matrix_needs_a_quarter_turn() {
        let still = question("Matrice 2x2: [→][→] / [↓][?]", &["←", "→", "↓", "↑"]);
        assert!(Matrix.analyze(&still).is_err());

        let half = question("Matrice 2x2: [→][←] / [↓][?]", &["←", "→", "↓", "↑"]);
        assert!(Matrix.analyze(&half).is_err());
    }

    #[test]
    fn test_additive_matrix() {
        let q = question("Matrix: [2][5] / [4][?]", &["6", "7", "8"]);
        let a = Matrix.analyze(&q).unwrap();
        assert_eq!(a.expected_next, OptionValue::Number(7.0));
        assert_eq!(a.valid_options, vec![1]);
        assert_eq!(a.details["size"], "2x2");
    }

    #[test]
    fn test_row_sum_matrix() {
        let q = question(
            "Matrice 3x3: [1][2][3] [3][1][2] [4][1][?]",
            &["0", "1", "2"],
        );
        let a = Matrix.analyze(&q).unwrap();
        assert_eq!(a.rule, "Constant row sum");
        assert_eq!(a.valid_options, vec![1]);
    }

    #[test]
    fn test_row_steps_matrix() {
        let q = question(
            "Matrice: [1][3][5] [2][5][8] [3][7][?]",
            &["9", "10", "11"],
        );
        let a = Matrix.analyze(&q).unwrap();
        assert_eq!(a.rule, "Arithmetic rows");
        assert_eq!(a.valid_options, vec![2]);
    }

    #[test]
    fn test_latin_square_grid() {
        let q = question(
            "Complétez la grille: [●][■][▲] [■][▲][●] [▲][●][?]",
            &["●", "■", "▲"],
        );
        let a = GridCompletion.analyze(&q).unwrap();
        assert_eq!(a.rule, "Latin square");
        assert_eq!(a.expected_next, OptionValue::Symbol("■".into()));
        assert_eq!(a.valid_options, vec![1]);
    }

    #[test]
    fn test_grid_needs_trailing_gap() {
        let q = question("Grille: [1][?][3][4]", &["2"]);
        assert!(matches!(
            GridCompletion.analyze(&q),
            Err(RuleError::Extraction { .. })
        ));
    }

    #[test]
    fn test_matrix_without_cells() {
        let q = question("Quelle matrice 3x3 est symétrique ?", &["A", "B"]);
        assert!(matches!(
            Matrix.analyze(&q),
            Err(RuleError::Extraction { .. })
        ));
    }

    #[test]
    fn test_unexplained_grid() {
        let q = question("Grille: [1][7][2] [9][4][4] [8][3][?]", &["5"]);
        assert!(matches!(
            GridCompletion.analyze(&q),
            Err(RuleError::PatternMismatch { .. })
        ));
    }
}
