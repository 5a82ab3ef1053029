use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use crate::install::InstalledPlugin;
use crate::kernel::constants::DEFAULT_GROUP;
use crate::metadata::{File, PluginMetadata};
use crate::sorting::error::SortingError;
use crate::sorting::group_graph::{check_for_cycles, GroupGraph};
use crate::sorting::vertex::{EdgeType, Vertex};

/// What the sorter needs to know about one installed plugin.
///
/// Metadata passed in is expected to be merged and condition-filtered
/// already; only the plugin names are taken from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSortingData {
    pub name: String,
    pub is_master: bool,
    pub masters: Vec<String>,
    /// Effective group
    pub group: String,
    pub masterlist_load_after: Vec<String>,
    pub user_load_after: Vec<String>,
    pub masterlist_requirements: Vec<String>,
    pub user_requirements: Vec<String>,
    /// Position in the current load order, if the plugin has one
    pub load_order_index: Option<usize>,
}

impl PluginSortingData {
    pub fn new(
        plugin: &InstalledPlugin,
        masterlist: Option<&PluginMetadata>,
        user: Option<&PluginMetadata>,
        load_order_index: Option<usize>,
    ) -> Self {
        let group = user
            .and_then(|m| m.group.clone())
            .or_else(|| masterlist.and_then(|m| m.group.clone()))
            .unwrap_or_else(|| DEFAULT_GROUP.to_string());

        Self {
            name: plugin.name.clone(),
            is_master: plugin.is_master,
            masters: plugin.masters.clone(),
            group,
            masterlist_load_after: masterlist.map(|m| file_names(&m.load_after)).unwrap_or_default(),
            user_load_after: user.map(|m| file_names(&m.load_after)).unwrap_or_default(),
            masterlist_requirements: masterlist.map(|m| file_names(&m.requirements)).unwrap_or_default(),
            user_requirements: user.map(|m| file_names(&m.requirements)).unwrap_or_default(),
            load_order_index,
        }
    }
}

fn file_names(files: &[File]) -> Vec<String> {
    files.iter().map(|f| f.name.clone()).collect()
}

/// Graph over installed plugins; an edge means "loads before".
#[derive(Debug)]
pub struct PluginGraph {
    nodes: Vec<PluginSortingData>,
    /// Lowercased name -> node
    index: HashMap<String, usize>,
    edges: Vec<Vec<(usize, EdgeType)>>,
    edge_set: HashSet<(usize, usize)>,
}

impl PluginGraph {
    /// Nodes are held in case-insensitive name order, whatever order the
    /// plugins arrive in and whatever their load order positions. Edges
    /// are added in node order, so the graph built for a set of plugins and
    /// their metadata is always the same.
    pub fn new(mut plugins: Vec<PluginSortingData>) -> Self {
        plugins.sort_by_cached_key(|plugin| plugin.name.to_lowercase());

        let mut nodes: Vec<PluginSortingData> = Vec::with_capacity(plugins.len());
        let mut index = HashMap::new();
        for plugin in plugins {
            let key = plugin.name.to_lowercase();
            if index.contains_key(&key) {
                log::warn!("Ignoring duplicate plugin '{}' in sorting input", plugin.name);
                continue;
            }
            index.insert(key, nodes.len());
            nodes.push(plugin);
        }

        Self {
            edges: vec![Vec::new(); nodes.len()],
            nodes,
            index,
            edge_set: HashSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_set.len()
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.index.get(&name.to_lowercase()).copied()
    }

    /// Adds an edge unless it is a self-loop or already present.
    fn add_edge(&mut self, from: usize, to: usize, edge_type: EdgeType) {
        if from == to || !self.edge_set.insert((from, to)) {
            return;
        }
        log::trace!(
            "Adding {} edge: '{}' loads before '{}'",
            edge_type,
            self.nodes[from].name,
            self.nodes[to].name
        );
        self.edges[from].push((to, edge_type));
    }

    /// Adds edges from header masters, master flags and load-after and
    /// requirement rules. References to plugins that are not installed are
    /// ignored.
    pub fn add_specific_edges(&mut self) {
        let mut pending = Vec::new();

        for (i, plugin) in self.nodes.iter().enumerate() {
            let rules = [
                (&plugin.masters, EdgeType::Master),
                (&plugin.masterlist_requirements, EdgeType::MasterlistRequirement),
                (&plugin.user_requirements, EdgeType::UserRequirement),
                (&plugin.masterlist_load_after, EdgeType::MasterlistLoadAfter),
                (&plugin.user_load_after, EdgeType::UserLoadAfter),
            ];
            for (names, edge_type) in rules {
                for name in names {
                    if let Some(j) = self.find(name) {
                        pending.push((j, i, edge_type));
                    }
                }
            }

            if plugin.is_master {
                for (j, other) in self.nodes.iter().enumerate() {
                    if !other.is_master {
                        pending.push((i, j, EdgeType::MasterFlag));
                    }
                }
            }
        }

        for (from, to, edge_type) in pending {
            self.add_edge(from, to, edge_type);
        }
    }

    /// Makes `main_master` load before every other plugin.
    pub fn add_main_master_edges(&mut self, main_master: &str) {
        let Some(master) = self.find(main_master) else {
            return;
        };
        for other in 0..self.nodes.len() {
            self.add_edge(master, other, EdgeType::Master);
        }
    }

    /// Adds edges so that each group's plugins load before the plugins of
    /// every group that loads after it.
    ///
    /// An edge is skipped when the graph already has a path the other way,
    /// so group order never overrides a specific rule.
    pub fn add_group_edges(&mut self, groups: &GroupGraph) -> Result<(), SortingError> {
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); groups.node_count()];
        for (i, plugin) in self.nodes.iter().enumerate() {
            let group = groups
                .index_of(&plugin.group)
                .ok_or_else(|| SortingError::UndefinedGroup(plugin.group.clone()))?;
            members[group].push(i);
        }

        for group in 0..groups.node_count() {
            if members[group].is_empty() {
                continue;
            }
            for later_group in groups.descendants(group) {
                for &from in &members[group] {
                    for &to in &members[later_group] {
                        if self.edge_set.contains(&(from, to)) {
                            continue;
                        }
                        if self.path_exists(to, from) {
                            log::debug!(
                                "Skipping group edge from '{}' to '{}': it would contradict an existing path",
                                self.nodes[from].name,
                                self.nodes[to].name
                            );
                            continue;
                        }
                        self.add_edge(from, to, EdgeType::Group);
                    }
                }
            }
        }

        Ok(())
    }

    fn path_exists(&self, from: usize, to: usize) -> bool {
        let mut seen = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);
        while let Some(node) = queue.pop_front() {
            if node == to {
                return true;
            }
            for &(next, _) in &self.edges[node] {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        false
    }

    /// Kahn's algorithm. Among plugins ready to load, the one earliest in the
    /// current load order goes first; plugins without a position follow, by
    /// case-insensitive name.
    pub fn topological_sort(&self) -> Result<Vec<String>, SortingError> {
        let mut by_priority: Vec<usize> = (0..self.nodes.len()).collect();
        by_priority.sort_by_key(|&i| {
            let plugin = &self.nodes[i];
            (plugin.load_order_index.unwrap_or(usize::MAX), plugin.name.to_lowercase())
        });
        let mut rank = vec![0; self.nodes.len()];
        for (position, &node) in by_priority.iter().enumerate() {
            rank[node] = position;
        }

        let mut in_degree = vec![0usize; self.nodes.len()];
        for edges in &self.edges {
            for &(to, _) in edges {
                in_degree[to] += 1;
            }
        }

        let mut ready: BinaryHeap<Reverse<usize>> = (0..self.nodes.len())
            .filter(|&i| in_degree[i] == 0)
            .map(|i| Reverse(rank[i]))
            .collect();

        let mut sorted = Vec::with_capacity(self.nodes.len());
        let mut placed = vec![false; self.nodes.len()];
        while let Some(Reverse(next_rank)) = ready.pop() {
            let node = by_priority[next_rank];
            placed[node] = true;
            sorted.push(self.nodes[node].name.clone());

            for &(to, _) in &self.edges[node] {
                in_degree[to] -= 1;
                if in_degree[to] == 0 {
                    ready.push(Reverse(rank[to]));
                }
            }
        }

        if sorted.len() < self.nodes.len() {
            let remaining: Vec<usize> = by_priority.into_iter().filter(|&i| !placed[i]).collect();
            let cycle = self.shortest_cycle(&remaining);
            log::error!("Cyclic interaction detected among {} plugins", remaining.len());
            return Err(SortingError::Cycle(cycle));
        }

        Ok(sorted)
    }

    /// Shortest cycle through the given nodes, found by a BFS from each one.
    fn shortest_cycle(&self, candidates: &[usize]) -> Vec<Vertex> {
        let allowed: HashSet<usize> = candidates.iter().copied().collect();
        let mut best: Option<Vec<(usize, EdgeType)>> = None;

        for &start in candidates {
            let Some(cycle) = self.cycle_through(start, &allowed) else {
                continue;
            };
            if best.as_ref().is_none_or(|b| cycle.len() < b.len()) {
                best = Some(cycle);
            }
        }

        best.unwrap_or_default()
            .into_iter()
            .map(|(node, edge_type)| Vertex::with_edge(&self.nodes[node].name, edge_type))
            .collect()
    }

    /// The shortest cycle returning to `start`, as (node, edge to next) pairs.
    fn cycle_through(&self, start: usize, allowed: &HashSet<usize>) -> Option<Vec<(usize, EdgeType)>> {
        let mut predecessor: HashMap<usize, (usize, EdgeType)> = HashMap::new();
        let mut queue = VecDeque::from([start]);
        let mut closing_edge = None;

        'search: while let Some(node) = queue.pop_front() {
            for &(next, edge_type) in &self.edges[node] {
                if !allowed.contains(&next) {
                    continue;
                }
                if next == start {
                    closing_edge = Some((node, edge_type));
                    break 'search;
                }
                if !predecessor.contains_key(&next) {
                    predecessor.insert(next, (node, edge_type));
                    queue.push_back(next);
                }
            }
        }

        let (last, last_edge) = closing_edge?;
        let mut cycle = vec![(last, last_edge)];
        let mut current = last;
        while current != start {
            let &(previous, edge_type) = predecessor.get(&current)?;
            cycle.push((previous, edge_type));
            current = previous;
        }
        cycle.reverse();
        Some(cycle)
    }
}

/// Sorts plugins into a load order consistent with every rule and group
/// relation. Fails on a cycle in either graph or an undefined group.
pub fn sort_plugins(plugins: Vec<PluginSortingData>, groups: &GroupGraph) -> Result<Vec<String>, SortingError> {
    sort_plugins_with_main_master(plugins, groups, None)
}

/// Like [`sort_plugins`], additionally placing the game's main master file
/// before everything else.
pub fn sort_plugins_with_main_master(
    plugins: Vec<PluginSortingData>,
    groups: &GroupGraph,
    main_master: Option<&str>,
) -> Result<Vec<String>, SortingError> {
    check_for_cycles(groups)?;

    let mut graph = PluginGraph::new(plugins);
    if graph.is_empty() {
        return Ok(Vec::new());
    }

    graph.add_specific_edges();
    if let Some(main_master) = main_master {
        graph.add_main_master_edges(main_master);
    }
    graph.add_group_edges(groups)?;

    log::debug!(
        "Sorting {} plugins over {} edges",
        graph.len(),
        graph.edge_count()
    );

    graph.topological_sort()
}
