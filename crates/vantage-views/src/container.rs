//! Per-view containers and their one-time materialization
//!
//! Materializing a container requests the view's toolbar items and content
//! together, then inserts a toolbar (skipped when empty) ahead of the existing
//! children and attaches the content. Nothing is attached unless both
//! producers succeed. The whole step runs at most once per container: every
//! request after the first gets the same `Materialization` back.

use futures_util::future::{self, BoxFuture, FutureExt};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::element::{Content, Element, ToolbarItem};
use crate::memo::{Memo, Pending};
use crate::view::ViewRef;
use crate::Result;

/// Shared handle to a container's one-shot materialization.
pub type Materialization = Pending<Result<()>>;

/// Issues both producer requests right away and waits for them together.
fn produce(view: &ViewRef) -> BoxFuture<'static, Result<(Vec<ToolbarItem>, Content)>> {
    let toolbar = view.toolbar_items();
    let content = view.content();
    let view_id = view.view_id().to_string();

    async move {
        let (items, content) = future::join(toolbar, content).await;
        match (&items, &content) {
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(view_id = %view_id, error = %e, "View materialization failed");
            }
            _ => {}
        }
        Ok((items?, content?))
    }
    .boxed()
}

/// Wrapper used by tabbed locations: content is attached as soon as it exists.
pub struct ContainerWidget {
    view: ViewRef,
    element: Element,
    materialized: Memo<Result<()>>,
}

impl ContainerWidget {
    pub fn new(view: ViewRef) -> Self {
        Self {
            view,
            element: Element::new("view-container"),
            materialized: Memo::new(),
        }
    }

    pub fn view(&self) -> &ViewRef {
        &self.view
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn materialize(&self) -> Materialization {
        self.materialized.get_or_init(|| {
            tracing::debug!(view_id = %self.view.view_id(), "Materializing view");

            let produced = produce(&self.view);
            let element = self.element.clone();
            async move {
                let (items, content) = produced.await?;
                element.prepend_toolbar("", items);
                element.attach(&content);
                Ok(())
            }
        })
    }

    pub fn is_materialized(&self) -> bool {
        matches!(self.materialized.peek(), Some(Ok(())))
    }
}

/// Keys that toggle an expandable header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKey {
    Enter,
    Space,
    Other,
}

#[derive(Default)]
struct ExpandState {
    expanded: bool,
    content: Option<Content>,
}

/// Wrapper used by stack locations: a clickable title header followed by the
/// content, which is only attached while expanded.
pub struct ExpandableContainerWidget {
    view: ViewRef,
    header: Element,
    body: Element,
    state: Arc<Mutex<ExpandState>>,
    materialized: Memo<Result<()>>,
}

impl ExpandableContainerWidget {
    pub fn new(view: ViewRef) -> Self {
        let header = Element::new("expandable-view-title");
        header.append_label(view.title());

        Self {
            view,
            header,
            body: Element::new("expandable-view-body"),
            state: Arc::new(Mutex::new(ExpandState::default())),
            materialized: Memo::new(),
        }
    }

    pub fn view(&self) -> &ViewRef {
        &self.view
    }

    pub fn header(&self) -> &Element {
        &self.header
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    pub fn is_expanded(&self) -> bool {
        self.state.lock().expanded
    }

    pub fn is_materialized(&self) -> bool {
        matches!(self.materialized.peek(), Some(Ok(())))
    }

    /// Toolbar items land in the header; content is kept aside until the
    /// expanded flag says it may be attached.
    pub fn materialize(&self) -> Materialization {
        self.materialized.get_or_init(|| {
            tracing::debug!(view_id = %self.view.view_id(), "Materializing stacked view");

            let produced = produce(&self.view);
            let header = self.header.clone();
            let body = self.body.clone();
            let state = Arc::clone(&self.state);
            async move {
                let (items, content) = produced.await?;
                header.prepend_toolbar("", items);
                state.lock().content = Some(content);
                sync_attachment(&state, &body);
                Ok(())
            }
        })
    }

    /// Expands and resolves once the content is attached. Expanding an
    /// expanded container just waits on the existing materialization.
    pub fn expand(&self) -> BoxFuture<'static, Result<()>> {
        {
            let mut state = self.state.lock();
            if !state.expanded {
                state.expanded = true;
                tracing::debug!(view_id = %self.view.view_id(), "Expanded view");
            }
        }

        let materialized = self.materialize();
        let body = self.body.clone();
        let state = Arc::clone(&self.state);
        async move {
            materialized.await?;
            sync_attachment(&state, &body);
            Ok(())
        }
        .boxed()
    }

    /// Detaches the content; the materialization stays memoized.
    pub fn collapse(&self) {
        {
            let mut state = self.state.lock();
            if !state.expanded {
                return;
            }
            state.expanded = false;
        }
        tracing::debug!(view_id = %self.view.view_id(), "Collapsed view");
        sync_attachment(&self.state, &self.body);
    }

    /// Header click.
    pub fn toggle_expanded(&self) -> BoxFuture<'static, Result<()>> {
        if self.is_expanded() {
            self.collapse();
            future::ready(Ok(())).boxed()
        } else {
            self.expand()
        }
    }

    /// Header key press; only Enter and Space toggle.
    pub fn on_header_key(&self, key: HeaderKey) -> Option<BoxFuture<'static, Result<()>>> {
        match key {
            HeaderKey::Enter | HeaderKey::Space => Some(self.toggle_expanded()),
            HeaderKey::Other => None,
        }
    }
}

/// Makes the body match the expanded flag. Safe to call in any order from
/// expand, collapse and materialization continuations.
fn sync_attachment(state: &Mutex<ExpandState>, body: &Element) {
    let (expanded, content) = {
        let state = state.lock();
        (state.expanded, state.content.clone())
    };

    let Some(content) = content else {
        return;
    };

    if expanded {
        body.attach(&content);
    } else {
        body.detach(&content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Widget;
    use crate::error::ViewError;
    use crate::view::View;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    struct Panel;

    impl Widget for Panel {
        fn name(&self) -> &str {
            "panel"
        }
    }

    /// Counts producer calls; content can be held back with a oneshot.
    struct CountingView {
        id: String,
        items: Vec<ToolbarItem>,
        toolbar_calls: AtomicUsize,
        content_calls: AtomicUsize,
        gate: Mutex<Option<oneshot::Receiver<()>>>,
        fail_content: bool,
    }

    impl CountingView {
        fn new(id: &str) -> Self {
            Self {
                id: id.to_string(),
                items: Vec::new(),
                toolbar_calls: AtomicUsize::new(0),
                content_calls: AtomicUsize::new(0),
                gate: Mutex::new(None),
                fail_content: false,
            }
        }
    }

    impl View for CountingView {
        fn view_id(&self) -> &str {
            &self.id
        }

        fn title(&self) -> &str {
            &self.id
        }

        fn is_closeable(&self) -> bool {
            false
        }

        fn is_transient(&self) -> bool {
            false
        }

        fn toolbar_items(&self) -> BoxFuture<'static, Result<Vec<ToolbarItem>>> {
            self.toolbar_calls.fetch_add(1, Ordering::SeqCst);
            future::ready(Ok(self.items.clone())).boxed()
        }

        fn content(&self) -> BoxFuture<'static, Result<Content>> {
            self.content_calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.gate.lock().take();
            let fail = self.fail_content;
            let id = self.id.clone();
            async move {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                if fail {
                    return Err(ViewError::producer(id, "content", "boom"));
                }
                Ok(Arc::new(Panel) as Content)
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_concurrent_materialize_produces_once() {
        let (tx, rx) = oneshot::channel();
        let view = Arc::new(CountingView::new("console"));
        *view.gate.lock() = Some(rx);

        let container = ContainerWidget::new(view.clone());
        let first = container.materialize();
        let second = container.materialize();
        let third = container.materialize();
        assert!(!container.is_materialized());

        tx.send(()).unwrap();
        let (a, b, c) = future::join3(first, second, third).await;
        assert!(a.is_ok() && b.is_ok() && c.is_ok());

        container.materialize().await.unwrap();
        assert_eq!(view.toolbar_calls.load(Ordering::SeqCst), 1);
        assert_eq!(view.content_calls.load(Ordering::SeqCst), 1);
        assert!(container.is_materialized());
        assert_eq!(container.element().widgets().len(), 1);
    }

    #[tokio::test]
    async fn test_toolbar_inserted_before_content() {
        let mut view = CountingView::new("network");
        view.items = vec![ToolbarItem::button("record", "Record")];
        let container = ContainerWidget::new(Arc::new(view));

        container.materialize().await.unwrap();

        let children = container.element().children();
        assert_eq!(children.len(), 2);
        assert!(matches!(children[0], crate::Node::Toolbar(_)));
        assert!(matches!(children[1], crate::Node::Widget(_)));
    }

    #[tokio::test]
    async fn test_producer_failure_attaches_nothing() {
        let mut view = CountingView::new("broken");
        view.items = vec![ToolbarItem::button("x", "X")];
        view.fail_content = true;
        let view = Arc::new(view);
        let container = ContainerWidget::new(view.clone());

        let err = container.materialize().await.unwrap_err();
        assert!(matches!(err, ViewError::Producer { what: "content", .. }));
        assert!(container.element().is_empty());

        // No retry: the failed result is memoized.
        assert!(container.materialize().await.is_err());
        assert_eq!(view.content_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expandable_starts_collapsed() {
        let view = Arc::new(CountingView::new("watch"));
        let container = ExpandableContainerWidget::new(view.clone());

        assert!(!container.is_expanded());
        assert!(container.body().is_empty());
        assert_eq!(view.content_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_collapse_keeps_materialization() {
        let view = Arc::new(CountingView::new("scope"));
        let container = ExpandableContainerWidget::new(view.clone());

        container.expand().await.unwrap();
        assert_eq!(container.body().widgets().len(), 1);

        container.collapse();
        assert!(container.body().is_empty());
        assert!(container.is_materialized());

        container.expand().await.unwrap();
        assert_eq!(container.body().widgets().len(), 1);
        assert_eq!(view.content_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rapid_double_click_fetches_once() {
        let (tx, rx) = oneshot::channel();
        let view = Arc::new(CountingView::new("breakpoints"));
        *view.gate.lock() = Some(rx);
        let container = ExpandableContainerWidget::new(view.clone());

        let opening = container.toggle_expanded();
        let closing = container.toggle_expanded();
        assert!(!container.is_expanded());

        tx.send(()).unwrap();
        closing.await.unwrap();
        opening.await.unwrap();

        // Collapsed before content arrived: nothing attached.
        assert!(container.body().is_empty());
        assert!(container.is_materialized());

        container.toggle_expanded().await.unwrap();
        assert_eq!(container.body().widgets().len(), 1);
        assert_eq!(view.content_calls.load(Ordering::SeqCst), 1);
        assert_eq!(view.toolbar_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_header_keys() {
        let mut view = CountingView::new("callstack");
        view.items = vec![ToolbarItem::toggle("async", "Async", true)];
        let container = ExpandableContainerWidget::new(Arc::new(view));

        assert!(container.on_header_key(HeaderKey::Other).is_none());
        container
            .on_header_key(HeaderKey::Enter)
            .unwrap()
            .await
            .unwrap();
        assert!(container.is_expanded());
        assert!(container.header().toolbar().is_some());

        container
            .on_header_key(HeaderKey::Space)
            .unwrap()
            .await
            .unwrap();
        assert!(!container.is_expanded());
    }
}
