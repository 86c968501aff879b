/// The strongly connected components of a directed graph.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Components {
    /// For each node, the index of its component.
    pub mapping: Vec<usize>,
    /// For each component, its nodes.
    pub components: Vec<Vec<usize>>,
}

struct TarjanState {
    // Discovery index of each node, starting at 1. 0 marks an unvisited node.
    indexes: Vec<usize>,
    low_links: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next_index: usize,
}

impl TarjanState {
    fn discover(&mut self, node: usize) {
        self.indexes[node] = self.next_index;
        self.low_links[node] = self.next_index;
        self.next_index += 1;
        self.stack.push(node);
        self.on_stack[node] = true;
    }
}

/// Tarjan's algorithm for the strongly connected components.
///
/// `edges[node]` lists the successors of `node`. The components are returned
/// in reverse topological order: a component only has edges to components
/// found before it.
///
/// The depth-first search keeps its own stack of frames instead of recursing,
/// so that large graphs do not exhaust the call stack.
pub fn tarjan_scc(edges: &[Vec<usize>]) -> Components {
    let num_nodes = edges.len();
    let mut state = TarjanState {
        indexes: vec![0; num_nodes],
        low_links: vec![0; num_nodes],
        on_stack: vec![false; num_nodes],
        stack: Vec::with_capacity(num_nodes),
        next_index: 1,
    };
    let mut mapping: Vec<usize> = vec![0; num_nodes];
    let mut components: Vec<Vec<usize>> = Vec::new();
    // (node, position of the next edge to follow)
    let mut frames: Vec<(usize, usize)> = Vec::new();

    for root in 0..num_nodes {
        if state.indexes[root] != 0 {
            continue;
        }
        state.discover(root);
        frames.push((root, 0));

        while let Some(&(node, next_edge)) = frames.last() {
            if let Some(&link) = edges[node].get(next_edge) {
                let top = frames.len() - 1;
                frames[top].1 += 1;
                if state.indexes[link] == 0 {
                    state.discover(link);
                    frames.push((link, 0));
                } else if state.on_stack[link] {
                    state.low_links[node] = state.low_links[node].min(state.indexes[link]);
                }
                continue;
            }

            // All the successors of the node are done.
            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                state.low_links[parent] = state.low_links[parent].min(state.low_links[node]);
            }
            if state.low_links[node] == state.indexes[node] {
                let component_index = components.len();
                let mut component: Vec<usize> = Vec::new();
                while let Some(member) = state.stack.pop() {
                    state.on_stack[member] = false;
                    mapping[member] = component_index;
                    component.push(member);
                    if member == node {
                        break;
                    }
                }
                components.push(component);
            }
        }
    }

    Components {
        mapping,
        components,
    }
}
