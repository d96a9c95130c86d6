use egui::Pos2;
use rand::Rng;

use crate::{
    BlockData, BlockStatus, BlockVisual, MemoryRepository, Node, NodeId, RunState, ShapeVariant,
    View, ViewId, ViewRepository,
};

struct Role {
    label: &'static str,
    variant: ShapeVariant,
    icon: &'static str,
    color: &'static str,
}

const ROLES: [Role; 4] = [
    Role {
        label: "System",
        variant: ShapeVariant::Rugged,
        icon: "server",
        color: "amber",
    },
    Role {
        label: "Service",
        variant: ShapeVariant::Default,
        icon: "activity",
        color: "blue",
    },
    Role {
        label: "Worker",
        variant: ShapeVariant::Sleek,
        icon: "cpu",
        color: "purple",
    },
    Role {
        label: "Database",
        variant: ShapeVariant::Rugged,
        icon: "database",
        color: "red",
    },
];

const MOCK_LOGIC: &str = "// Processing...";

/// Generator of a nested mock hierarchy of block views.
///
/// The root view gets `fanout` blocks, and every block above `max_depth` gets a
/// view of its own holding `fanout` children. Child ids are `{view}-child-{i}`.
#[derive(Clone, Debug)]
pub struct MockHierarchy {
    max_depth: usize,
    fanout: usize,
    jitter: f32,
}

impl Default for MockHierarchy {
    fn default() -> Self {
        Self {
            max_depth: 10,
            fanout: 3,
            jitter: 0.0,
        }
    }
}

impl MockHierarchy {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_fanout(mut self, fanout: usize) -> Self {
        self.fanout = fanout;
        self
    }

    /// Maximum random offset applied to each block location on both axes.
    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter.abs();
        self
    }

    pub fn build(&self) -> MemoryRepository {
        let mut repo = MemoryRepository::new();
        self.populate(&mut repo);
        repo
    }

    pub fn populate<R: ViewRepository>(&self, repo: &mut R) {
        self.populate_with_rng(repo, &mut rand::rng());
    }

    pub fn populate_with_rng<R, G>(&self, repo: &mut R, rng: &mut G)
    where
        R: ViewRepository,
        G: Rng + ?Sized,
    {
        self.level(repo, rng, &ViewId::root(), 1);
        log::debug!(
            "generated mock hierarchy: depth {}, fanout {}",
            self.max_depth,
            self.fanout
        );
    }

    fn level<R, G>(&self, repo: &mut R, rng: &mut G, view: &ViewId, depth: usize)
    where
        R: ViewRepository,
        G: Rng + ?Sized,
    {
        if depth > self.max_depth {
            return;
        }

        let mut nodes = Vec::with_capacity(self.fanout);
        for i in 0..self.fanout {
            let id = NodeId::new(format!("{view}-child-{i}"));
            let role = &ROLES[i % ROLES.len()];
            let location = self.location(rng, i);

            let data = BlockData {
                visual: BlockVisual {
                    variant: role.variant,
                    color: role.color.to_string(),
                    icon: role.icon.to_string(),
                },
                status: BlockStatus {
                    state: RunState::Running,
                    ..Default::default()
                },
                logic: Some(MOCK_LOGIC.to_string()),
            };

            self.level(repo, rng, &ViewId::from(&id), depth + 1);
            nodes.push(Node::block(
                id,
                format!("{} L{depth}", role.label),
                location,
                data,
            ));
        }

        repo.store(view.clone(), View::new(nodes, Vec::new()));
    }

    fn location<G: Rng + ?Sized>(&self, rng: &mut G, i: usize) -> Pos2 {
        let base = Pos2::new(100. + i as f32 * 300., 150. + (i % 2) as f32 * 50.);
        if self.jitter <= 0.0 {
            return base;
        }

        Pos2::new(
            base.x + rng.random_range(-self.jitter..=self.jitter),
            base.y + rng.random_range(-self.jitter..=self.jitter),
        )
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn view_count_follows_depth_and_fanout() {
        let repo = MockHierarchy::default()
            .with_max_depth(3)
            .with_fanout(2)
            .build();

        // root + 2 + 4 views, blocks of the last level have none
        assert_eq!(repo.len(), 7);
        assert!(repo.contains(&ViewId::new("root-child-0-child-1")));
        assert!(!repo.contains(&ViewId::new("root-child-0-child-1-child-0")));
    }

    #[test]
    fn roles_cycle_and_labels_carry_depth() {
        let repo = MockHierarchy::default()
            .with_max_depth(2)
            .with_fanout(5)
            .build();

        let root = repo.get(&ViewId::root()).unwrap();
        let labels = root.nodes.iter().map(Node::label).collect::<Vec<_>>();
        assert_eq!(
            labels,
            [
                "System L1",
                "Service L1",
                "Worker L1",
                "Database L1",
                "System L1"
            ]
        );

        let nested = repo.get(&ViewId::new("root-child-4")).unwrap();
        assert_eq!(nested.nodes[0].label(), "System L2");
        assert!(nested.edges.is_empty());
    }

    #[test]
    fn locations_without_jitter_are_fixed() {
        let repo = MockHierarchy::default().with_max_depth(1).build();
        let root = repo.get(&ViewId::root()).unwrap();
        let locations = root.nodes.iter().map(Node::location).collect::<Vec<_>>();
        assert_eq!(
            locations,
            [
                Pos2::new(100., 150.),
                Pos2::new(400., 200.),
                Pos2::new(700., 150.)
            ]
        );
    }

    #[test]
    fn jitter_stays_in_bounds_and_is_seeded() {
        let mock = MockHierarchy::default().with_max_depth(1).with_jitter(10.);

        let mut a = MemoryRepository::new();
        mock.populate_with_rng(&mut a, &mut StdRng::seed_from_u64(7));
        let mut b = MemoryRepository::new();
        mock.populate_with_rng(&mut b, &mut StdRng::seed_from_u64(7));
        assert_eq!(a.get(&ViewId::root()), b.get(&ViewId::root()));

        let first = &a.get(&ViewId::root()).unwrap().nodes[0];
        assert!((first.location().x - 100.).abs() <= 10.);
        assert!((first.location().y - 150.).abs() <= 10.);
    }
}
