use crate::grid::Position;

/// Manhattan distance. Admissible and consistent on a 4-connected grid with
/// unit step costs.
pub fn manhattan(a: Position, b: Position) -> u32 {
    (a.row.abs_diff(b.row) + a.col.abs_diff(b.col)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_is_symmetric() {
        let a = Position::new(1, 7);
        let b = Position::new(4, 2);
        assert_eq!(manhattan(a, b), 8);
        assert_eq!(manhattan(b, a), 8);
        assert_eq!(manhattan(a, a), 0);
    }

    #[test]
    fn manhattan_changes_by_at_most_one_per_step() {
        let goal = Position::new(3, 3);
        for row in 0..6 {
            for col in 0..5 {
                let here = Position::new(row, col);
                let right = Position::new(row, col + 1);
                assert!(manhattan(here, goal).abs_diff(manhattan(right, goal)) <= 1);
            }
        }
    }
}
