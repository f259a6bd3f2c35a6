use super::words::WordList;
use super::{Freshness, InvariantError};

pub(crate) type NodeId = usize;

/// One display line in the chain: the word list plus neighbor ids, the
/// reflow-dirty flag, and the repaint-freshness marker the renderer reads.
#[derive(Debug)]
pub(crate) struct LineNode {
    pub(crate) line: WordList,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    pub(crate) needs_reflow: bool,
    freshness: Freshness,
}

impl LineNode {
    fn new(line: WordList) -> Self {
        let needs_reflow = !line.is_empty();
        Self {
            line,
            prev: None,
            next: None,
            needs_reflow,
            freshness: Freshness::Whole,
        }
    }

    pub(crate) fn freshness(&self) -> Freshness {
        self.freshness
    }

    pub(crate) fn set_clean(&mut self) {
        self.freshness = Freshness::Clean;
    }
}

/// The line nodes live in a slab: stable indices, neighbor ids instead of
/// owning links, so a splice is a local index update. Spliced-out slots go
/// on a free list and are reused by later inserts. The head is never
/// spliced out (only successors are), so its id is stable for the life of
/// the chain.
#[derive(Debug)]
pub(crate) struct LineChain {
    nodes: Vec<LineNode>,
    free: Vec<NodeId>,
    head: NodeId,
    width: usize,
    indent: usize,
}

impl LineChain {
    pub(crate) fn new(width: usize, indent: usize, first_paragraph: &str) -> Self {
        Self {
            nodes: vec![LineNode::new(WordList::new(first_paragraph))],
            free: Vec::new(),
            head: 0,
            width,
            indent,
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &LineNode {
        &self.nodes[id]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut LineNode {
        &mut self.nodes[id]
    }

    pub(crate) fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].prev
    }

    pub(crate) fn next(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].next
    }

    pub(crate) fn head(&self) -> NodeId {
        self.head
    }

    pub(crate) fn tail(&self) -> NodeId {
        let mut id = self.head;
        while let Some(next) = self.nodes[id].next {
            id = next;
        }
        id
    }

    pub(crate) fn row(&self, id: NodeId) -> usize {
        let mut row = 0;
        let mut cur = id;
        while let Some(prev) = self.nodes[cur].prev {
            cur = prev;
            row += 1;
        }
        row
    }

    /// The node `steps` links after the head, if the chain is that long.
    pub(crate) fn node_at(&self, steps: usize) -> Option<NodeId> {
        let mut id = self.head;
        for _ in 0..steps {
            id = self.nodes[id].next?;
        }
        Some(id)
    }

    /// Linked ids from the head; lazy and restartable.
    pub(crate) fn ids(&self) -> ChainIds<'_> {
        ChainIds {
            chain: self,
            cur: Some(self.head),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.ids().count()
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    pub(crate) fn indent(&self) -> usize {
        self.indent
    }

    /// A line opens a paragraph when nothing precedes it or its
    /// predecessor closes one.
    pub(crate) fn is_paragraph_start(&self, id: NodeId) -> bool {
        match self.nodes[id].prev {
            None => true,
            Some(prev) => self.nodes[prev].line.ends_paragraph(),
        }
    }

    /// The width budget of one line: paragraph-first lines give up the
    /// indent columns.
    pub(crate) fn usable_width(&self, id: NodeId) -> usize {
        if self.is_paragraph_start(id) {
            self.width - self.indent
        } else {
            self.width
        }
    }

    /// Upgrade-only freshness marking: a whole-line repaint request is
    /// never downgraded to a cursor-only one within an operation.
    pub(crate) fn mark_fresh(&mut self, id: NodeId, freshness: Freshness) {
        let node = &mut self.nodes[id];
        node.freshness = match (node.freshness, freshness) {
            (Freshness::Whole, _) | (_, Freshness::Whole) => Freshness::Whole,
            (Freshness::Cursor, _) | (_, Freshness::Cursor) => Freshness::Cursor,
            (Freshness::Clean, Freshness::Clean) => Freshness::Clean,
        };
    }

    fn mark_whole_from(&mut self, id: NodeId) {
        let mut cur = Some(id);
        while let Some(at) = cur {
            self.nodes[at].freshness = Freshness::Whole;
            cur = self.nodes[at].next;
        }
    }

    pub(crate) fn mark_all_whole(&mut self) {
        self.mark_whole_from(self.head);
    }

    pub(crate) fn mark_all_dirty(&mut self) {
        let mut cur = Some(self.head);
        while let Some(at) = cur {
            self.nodes[at].needs_reflow = true;
            self.nodes[at].freshness = Freshness::Whole;
            cur = self.nodes[at].next;
        }
    }

    pub(crate) fn set_width(&mut self, width: usize) {
        self.width = width;
        self.mark_all_dirty();
    }

    fn alloc(&mut self, line: WordList) -> NodeId {
        let node = LineNode::new(line);
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Splice a new line in after `id`; every line from the new one on is
    /// marked for a whole repaint.
    pub(crate) fn insert_after(&mut self, id: NodeId, text: &str) -> NodeId {
        let new_id = self.alloc(WordList::new(text));
        let old_next = self.nodes[id].next;
        self.nodes[new_id].prev = Some(id);
        self.nodes[new_id].next = old_next;
        if let Some(next) = old_next {
            self.nodes[next].prev = Some(new_id);
        }
        self.nodes[id].next = Some(new_id);
        self.mark_whole_from(new_id);
        new_id
    }

    /// Splice out the successor of `id`; every line from `id` on is marked
    /// for a whole repaint.
    pub(crate) fn remove_next(&mut self, id: NodeId) {
        let Some(gone) = self.nodes[id].next else {
            return;
        };
        let after = self.nodes[gone].next;
        self.nodes[id].next = after;
        if let Some(next) = after {
            self.nodes[next].prev = Some(id);
        }
        self.nodes[gone].prev = None;
        self.nodes[gone].next = None;
        self.free.push(gone);
        self.mark_whole_from(id);
    }

    /// Attach a new paragraph after the current tail: the tail becomes
    /// paragraph-terminal and the new line follows it. Used only while
    /// building a document.
    pub(crate) fn append_paragraph(&mut self, text: &str) -> NodeId {
        let tail = self.tail();
        self.nodes[tail].line.set_eop(true);
        let id = self.alloc(WordList::new(text));
        self.nodes[id].prev = Some(tail);
        self.nodes[tail].next = Some(id);
        id
    }

    fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut LineNode, &mut LineNode) {
        debug_assert_ne!(a, b);
        if a < b {
            let (left, right) = self.nodes.split_at_mut(b);
            (&mut left[a], &mut right[0])
        } else {
            let (left, right) = self.nodes.split_at_mut(a);
            (&mut right[0], &mut left[b])
        }
    }

    /// Hand the line's last word to its successor, creating one first when
    /// none exists or when this line closes a paragraph (the fresh empty
    /// successor then receives the paragraph-end marker along with the
    /// word).
    pub(crate) fn push_to_next(&mut self, id: NodeId) -> Result<(), InvariantError> {
        if self.nodes[id].line.ends_paragraph() || self.nodes[id].next.is_none() {
            self.insert_after(id, "");
        }
        let Some(next) = self.nodes[id].next else {
            return Ok(());
        };
        let (node, successor) = self.pair_mut(id, next);
        node.line.push_last_word_to(&mut successor.line)?;
        successor.needs_reflow = true;
        self.mark_fresh(next, Freshness::Whole);
        Ok(())
    }

    /// Absorb the successor's first word; when that empties the successor
    /// it is spliced out of the chain.
    pub(crate) fn pull_from_next(&mut self, id: NodeId) -> Result<(), InvariantError> {
        let Some(next) = self.nodes[id].next else {
            return Ok(());
        };
        let (node, successor) = self.pair_mut(id, next);
        node.line.pull_first_word_from(&mut successor.line)?;
        successor.needs_reflow = true;
        self.mark_fresh(next, Freshness::Whole);
        if self.nodes[next].line.is_empty() {
            self.remove_next(id);
        }
        Ok(())
    }

    /// Whether absorbing the successor's first word keeps this line within
    /// budget. Pulls never cross this line's own paragraph end.
    fn pullable(&self, id: NodeId) -> bool {
        let node = &self.nodes[id];
        if node.line.ends_paragraph() {
            return false;
        }
        let Some(next) = node.next else {
            return false;
        };
        let first = self.nodes[next].line.first_word_len();
        let projected = if node.line.is_empty() {
            first
        } else {
            node.line.size() + first + 1
        };
        projected <= self.usable_width(id)
    }

    /// The propagating fix-up after any content or structure change.
    ///
    /// Phase one pushes overflow forward until the line fits; phase two
    /// pulls slack back while the result still fits. The fix-up then walks
    /// forward through lines the transfers dirtied, and stops at the first
    /// line needing no change; it never walks backward. Phase one strictly
    /// shrinks the line and phase two checks the budget before every pull,
    /// so the walk terminates. The width budget must exceed the longest
    /// word that can appear, else a word can never be made to fit; that is
    /// a configuration error checked at construction.
    pub(crate) fn reflow_from(&mut self, start: NodeId) -> Result<(), InvariantError> {
        self.nodes[start].needs_reflow = true;
        let mut cur = Some(start);
        while let Some(id) = cur {
            while self.nodes[id].line.size() > self.usable_width(id) {
                self.push_to_next(id)?;
            }
            while self.pullable(id) {
                self.pull_from_next(id)?;
            }
            self.nodes[id].needs_reflow = false;
            cur = self.nodes[id].next.filter(|&next| self.nodes[next].needs_reflow);
        }
        Ok(())
    }
}

pub(crate) struct ChainIds<'a> {
    chain: &'a LineChain,
    cur: Option<NodeId>,
}

impl Iterator for ChainIds<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.cur?;
        self.cur = self.chain.nodes[id].next;
        Some(id)
    }
}
