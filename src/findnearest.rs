use crate::prototypes::*;
use crate::world::*;

pub trait FindNearestItertools: Iterator {
    /// Nearest item by path length from `start_pos`. Items without a complete
    /// path are skipped. Ties keep the first item in iteration order.
    fn find_nearest_from<F, V>(self, start_pos: Position, generator: F) -> Option<V>
    where
        Self: Iterator<Item = V> + Sized,
        V: HasPosition,
        F: Fn(Position, Position) -> Path,
    {
        self.find_nearest_path_from(start_pos, generator).map(|(pos_object, _)| pos_object)
    }

    /// Like `find_nearest_from` but also hands back the winning path.
    fn find_nearest_path_from<F, V>(self, start_pos: Position, generator: F) -> Option<(V, Path)>
    where
        Self: Iterator<Item = V> + Sized,
        V: HasPosition,
        F: Fn(Position, Position) -> Path,
    {
        self.filter_map(|pos_object| {
            let path = generator(start_pos, pos_object.pos());

            if path.is_usable() {
                Some((path.len(), pos_object, path))
            } else {
                None
            }
        })
        .min_by_key(|(length, _, _)| *length)
        .map(|(_, pos_object, path)| (pos_object, path))
    }
}

impl<T: ?Sized> FindNearestItertools for T where T: Iterator {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Straight line path along the x axis, unreachable beyond x = 10.
    fn line_path(from: Position, to: Position) -> Path {
        let steps = from.get_range_to(to) as i32;
        Path {
            positions: (1..=steps).map(|i| from.offset(i * (to.x - from.x).signum(), 0)).collect(),
            incomplete: to.x > 10,
        }
    }

    #[test]
    fn nearest_by_path_skips_unreachable() {
        let targets = vec![Position::new(12, 0), Position::new(7, 0), Position::new(4, 0)];

        let nearest = targets.iter().map(|p| Target { id: ObjectId(p.x as u32), pos: *p });

        let found = nearest.find_nearest_from(Position::new(0, 0), line_path);

        assert_eq!(found.map(|t| t.id), Some(ObjectId(4)));
    }

    #[test]
    fn nearest_by_path_returns_path() {
        let targets = vec![Position::new(3, 0)];

        let (target, path) = targets
            .iter()
            .map(|p| Target { id: ObjectId(1), pos: *p })
            .find_nearest_path_from(Position::new(0, 0), line_path)
            .unwrap();

        assert_eq!(target.pos, Position::new(3, 0));
        assert_eq!(path.positions.last(), Some(&Position::new(3, 0)));
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn nothing_reachable_is_none() {
        let targets = vec![Position::new(20, 0)];

        let found = targets
            .iter()
            .map(|p| Target { id: ObjectId(1), pos: *p })
            .find_nearest_from(Position::new(0, 0), line_path);

        assert!(found.is_none());
    }
}
