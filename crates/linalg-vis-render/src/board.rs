//! Board: the store wired to a scene renderer.
//!
//! Every emission on any store slot triggers a full reconciliation pass over
//! the latest value of all four slots.

use crate::scene::{PassReport, SceneInputs, SceneRenderer, SceneStyle};
use crate::surface::DrawingSurface;
use linalg_vis_core::{AxisScale, BoardConfig, BoardStore, Matrix2, Shape, StoreResult, Subscription};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

/// Owns the store, the renderer, and the subscriptions between them.
pub struct Board<S: DrawingSurface + 'static> {
    store: Rc<BoardStore>,
    renderer: Rc<RefCell<SceneRenderer<S>>>,
    _subscriptions: Vec<Subscription>,
}

impl<S: DrawingSurface + 'static> Board<S> {
    /// Build the store from `config` and subscribe the renderer to it. The
    /// initial values are replayed, so the board is drawn on return.
    pub fn new(config: &BoardConfig, surface: S) -> StoreResult<Self> {
        let store = Rc::new(BoardStore::new(config)?);
        let renderer = Rc::new(RefCell::new(SceneRenderer::new(surface, SceneStyle::from(config))));

        let subscriptions = vec![
            store.matrix_changes(redraw_on_change::<S, Matrix2>(&store, &renderer)),
            store.shapes_changes(redraw_on_change::<S, Vec<Shape>>(&store, &renderer)),
            store.x_scale_changes(redraw_on_change::<S, AxisScale>(&store, &renderer)),
            store.y_scale_changes(redraw_on_change::<S, AxisScale>(&store, &renderer)),
        ];
        log::info!("Board ready with {} shape(s)", store.shapes().len());

        Ok(Self {
            store,
            renderer,
            _subscriptions: subscriptions,
        })
    }

    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    pub fn renderer(&self) -> Ref<'_, SceneRenderer<S>> {
        self.renderer.borrow()
    }

    pub fn renderer_mut(&self) -> RefMut<'_, SceneRenderer<S>> {
        self.renderer.borrow_mut()
    }

    /// Remove a shape: its primitives are erased right away, then it is
    /// filtered out of the store (which redraws without it).
    pub fn remove_shape(&self, id: &str) -> bool {
        let erased = self.renderer.borrow_mut().erase(id);
        let removed = self.store.remove_shape(id);
        if !removed && !erased {
            log::debug!("remove_shape: no shape \"{id}\"");
        }
        removed
    }

    /// Run a pass over the current store state.
    pub fn redraw(&self) -> PassReport {
        render_pass(&self.store, &mut self.renderer.borrow_mut())
    }
}

fn render_pass<S: DrawingSurface>(store: &BoardStore, renderer: &mut SceneRenderer<S>) -> PassReport {
    let matrix = store.matrix();
    let shapes = store.shapes();
    let x_scale = store.x_scale();
    let y_scale = store.y_scale();
    renderer.reconcile(&SceneInputs {
        matrix: &matrix,
        shapes: &shapes,
        x_scale: &x_scale,
        y_scale: &y_scale,
    })
}

/// Listener that redraws the whole board. Holds weak references so the
/// store does not keep itself or the renderer alive.
fn redraw_on_change<S: DrawingSurface + 'static, T>(
    store: &Rc<BoardStore>,
    renderer: &Rc<RefCell<SceneRenderer<S>>>,
) -> impl FnMut(&Rc<T>) + 'static {
    let store: Weak<BoardStore> = Rc::downgrade(store);
    let renderer = Rc::downgrade(renderer);
    move |_| {
        let (Some(store), Some(renderer)) = (store.upgrade(), renderer.upgrade()) else {
            return;
        };
        match renderer.try_borrow_mut() {
            Ok(mut renderer) => {
                render_pass(&store, &mut renderer);
            }
            Err(_) => log::error!("Store changed while the renderer was busy; pass skipped"),
        }
    }
}
