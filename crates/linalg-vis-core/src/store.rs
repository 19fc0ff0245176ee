//! Reactive board state.
//!
//! The store holds four independently replaceable slots (matrix, shapes,
//! x-scale, y-scale). Each slot is a [`Signal`]: subscribers get the current
//! value immediately and then every replacement, in order, synchronously.

use crate::config::BoardConfig;
use crate::matrix::{Matrix2, MatrixError};
use crate::scale::{AxisScale, ScaleError, Viewport, check_range};
use crate::shapes::{Dot, Ellipse, Polygon, Rectangle, Shape, ShapeError, ShapeId, Vector};
use kurbo::{Point, Vec2};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use thiserror::Error;

/// Store errors. A failed update never changes the store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Invalid matrix: {0}")]
    Matrix(#[from] MatrixError),
    #[error("Invalid scale: {0}")]
    Scale(#[from] ScaleError),
    #[error("Invalid shape: {0}")]
    Shape(#[from] ShapeError),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Ids of the base vector indicators.
pub const BASE_I_ID: &str = "base-i";
pub const BASE_J_ID: &str = "base-j";

/// Group id of the grid and axes. Shapes may not use it.
pub const AXIS_GROUP_ID: &str = "board-axis";

type Listener<T> = Rc<RefCell<dyn FnMut(&Rc<T>)>>;

struct SignalInner<T> {
    current: RefCell<Rc<T>>,
    listeners: RefCell<Vec<(u64, Listener<T>)>>,
    pending: RefCell<VecDeque<Rc<T>>>,
    /// Value being handed to listeners right now.
    in_flight: RefCell<Option<Rc<T>>>,
    delivering: Cell<bool>,
    next_listener: Cell<u64>,
}

/// Single-value broadcast channel with replay of the latest value.
///
/// A `set` issued while a delivery is running (from inside a listener) is
/// queued and delivered after the running one, so every listener observes
/// every value in order.
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T: 'static> Signal<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(SignalInner {
                current: RefCell::new(Rc::new(initial)),
                listeners: RefCell::new(Vec::new()),
                pending: RefCell::new(VecDeque::new()),
                in_flight: RefCell::new(None),
                delivering: Cell::new(false),
                next_listener: Cell::new(0),
            }),
        }
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> Rc<T> {
        Rc::clone(&self.inner.current.borrow())
    }

    /// Replace the value and notify every subscriber.
    pub fn set(&self, value: T) {
        let value = Rc::new(value);
        *self.inner.current.borrow_mut() = Rc::clone(&value);
        self.inner.pending.borrow_mut().push_back(value);
        if !self.inner.delivering.replace(true) {
            self.drain();
        }
    }

    /// Register a listener. It is called with the current value right away.
    ///
    /// A listener registered during a delivery is replayed the value being
    /// delivered and then receives the queued values in order.
    pub fn subscribe(&self, listener: impl FnMut(&Rc<T>) + 'static) -> Subscription {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);
        let listener: Listener<T> = Rc::new(RefCell::new(listener));
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::clone(&listener)));

        let was_delivering = self.inner.delivering.replace(true);
        let replay = match self.inner.in_flight.borrow().as_ref() {
            Some(value) if was_delivering => Rc::clone(value),
            _ => self.get(),
        };
        let previous = self.inner.in_flight.replace(Some(Rc::clone(&replay)));
        (&mut *listener.borrow_mut())(&replay);
        self.inner.in_flight.replace(previous);
        if !was_delivering {
            self.drain();
        }

        let weak: Weak<SignalInner<T>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
            }
        })
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn drain(&self) {
        loop {
            let next = self.inner.pending.borrow_mut().pop_front();
            let Some(value) = next else { break };
            self.inner.in_flight.replace(Some(Rc::clone(&value)));
            let listeners: Vec<Listener<T>> = self
                .inner
                .listeners
                .borrow()
                .iter()
                .map(|(_, l)| Rc::clone(l))
                .collect();
            for listener in listeners {
                (&mut *listener.borrow_mut())(&value);
            }
        }
        self.inner.in_flight.replace(None);
        self.inner.delivering.set(false);
    }
}

/// Keeps a listener registered; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Unsubscribe now.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// The board's single source of truth.
pub struct BoardStore {
    matrix: Signal<Matrix2>,
    shapes: Signal<Vec<Shape>>,
    x_scale: Signal<AxisScale>,
    y_scale: Signal<AxisScale>,
    viewport: Cell<Viewport>,
    max_range: f64,
    next_shape: Cell<u64>,
}

impl BoardStore {
    /// Create a store with the identity matrix and the configured scales.
    pub fn new(config: &BoardConfig) -> StoreResult<Self> {
        let viewport = config.viewport();
        let range = check_range(config.range, config.max_range)?;
        let (x_scale, y_scale) = viewport.scales(range)?;
        let shapes = if config.show_base_vectors {
            base_vectors(&config.base_i_color, &config.base_j_color)?
        } else {
            Vec::new()
        };
        Ok(Self {
            matrix: Signal::new(Matrix2::IDENTITY),
            shapes: Signal::new(shapes),
            x_scale: Signal::new(x_scale),
            y_scale: Signal::new(y_scale),
            viewport: Cell::new(viewport),
            max_range: config.max_range,
            next_shape: Cell::new(1),
        })
    }

    pub fn matrix(&self) -> Rc<Matrix2> {
        self.matrix.get()
    }

    pub fn shapes(&self) -> Rc<Vec<Shape>> {
        self.shapes.get()
    }

    pub fn x_scale(&self) -> AxisScale {
        *self.x_scale.get()
    }

    pub fn y_scale(&self) -> AxisScale {
        *self.y_scale.get()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    /// Publish a new matrix after checking its entries are finite.
    pub fn set_matrix(&self, matrix: Matrix2) -> StoreResult<()> {
        matrix.validate()?;
        log::debug!("Publishing matrix {matrix}");
        self.matrix.set(matrix);
        Ok(())
    }

    /// Publish a matrix given as untyped rows, checking it is 2x2.
    pub fn set_matrix_rows(&self, rows: &[Vec<f64>]) -> StoreResult<()> {
        let matrix = Matrix2::from_rows(rows)?;
        self.set_matrix(matrix)
    }

    /// Replace the shape collection. Id uniqueness is the caller's job.
    pub fn set_shapes(&self, shapes: Vec<Shape>) {
        log::debug!("Publishing {} shape(s)", shapes.len());
        self.shapes.set(shapes);
    }

    pub fn set_x_scale(&self, scale: AxisScale) {
        self.x_scale.set(scale);
    }

    pub fn set_y_scale(&self, scale: AxisScale) {
        self.y_scale.set(scale);
    }

    /// Largest range `set_range` accepts.
    pub fn max_range(&self) -> f64 {
        self.max_range
    }

    /// Zoom: rebuild both scales for a new visible range, at most
    /// [`max_range`](Self::max_range).
    pub fn set_range(&self, range: f64) -> StoreResult<()> {
        let range = check_range(range, self.max_range)?;
        let (x_scale, y_scale) = self.viewport.get().scales(range)?;
        self.set_x_scale(x_scale);
        self.set_y_scale(y_scale);
        Ok(())
    }

    /// Resize: rebuild both scales for a new viewport, keeping the range.
    pub fn set_viewport(&self, viewport: Viewport) -> StoreResult<()> {
        let (x_scale, y_scale) = viewport.scales(self.x_scale().range())?;
        self.viewport.set(viewport);
        self.set_x_scale(x_scale);
        self.set_y_scale(y_scale);
        Ok(())
    }

    pub fn matrix_changes(&self, listener: impl FnMut(&Rc<Matrix2>) + 'static) -> Subscription {
        self.matrix.subscribe(listener)
    }

    pub fn shapes_changes(&self, listener: impl FnMut(&Rc<Vec<Shape>>) + 'static) -> Subscription {
        self.shapes.subscribe(listener)
    }

    pub fn x_scale_changes(&self, listener: impl FnMut(&Rc<AxisScale>) + 'static) -> Subscription {
        self.x_scale.subscribe(listener)
    }

    pub fn y_scale_changes(&self, listener: impl FnMut(&Rc<AxisScale>) + 'static) -> Subscription {
        self.y_scale.subscribe(listener)
    }

    /// Next `shape-<n>` id. Ids are never handed out twice.
    pub fn next_id(&self) -> ShapeId {
        let n = self.next_shape.get();
        self.next_shape.set(n + 1);
        format!("shape-{n}")
    }

    pub fn contains(&self, id: &str) -> bool {
        self.shapes.get().iter().any(|s| s.id() == id)
    }

    /// Append a shape, rejecting an id already on the board.
    pub fn add_shape(&self, shape: Shape) -> StoreResult<ShapeId> {
        if shape.id() == AXIS_GROUP_ID {
            return Err(ShapeError::ReservedId(shape.id().to_string()).into());
        }
        let current = self.shapes.get();
        if current.iter().any(|s| s.id() == shape.id()) {
            return Err(ShapeError::DuplicateId(shape.id().to_string()).into());
        }
        let id = shape.id().to_string();
        let mut shapes = Vec::with_capacity(current.len() + 1);
        shapes.extend(current.iter().cloned());
        shapes.push(shape);
        self.set_shapes(shapes);
        Ok(id)
    }

    pub fn add_vector(&self, color: &str, x1: f64, y1: f64, x2: f64, y2: f64) -> StoreResult<ShapeId> {
        let shape = Vector::new(self.next_id(), color, x1, y1, x2, y2)?;
        self.add_shape(shape.into())
    }

    pub fn add_dot(&self, color: &str, x: f64, y: f64) -> StoreResult<ShapeId> {
        let shape = Dot::new(self.next_id(), color, x, y)?;
        self.add_shape(shape.into())
    }

    pub fn add_ellipse(&self, color: &str, cx: f64, cy: f64, rx: f64, ry: f64) -> StoreResult<ShapeId> {
        let shape = Ellipse::new(self.next_id(), color, cx, cy, rx, ry)?;
        self.add_shape(shape.into())
    }

    pub fn add_rectangle(&self, color: &str, x: f64, y: f64, width: f64, height: f64) -> StoreResult<ShapeId> {
        let shape = Rectangle::new(self.next_id(), color, x, y, width, height)?;
        self.add_shape(shape.into())
    }

    pub fn add_polygon(&self, color: &str, points: Vec<Point>) -> StoreResult<ShapeId> {
        let shape = Polygon::new(self.next_id(), color, points)?;
        self.add_shape(shape.into())
    }

    /// Filter a shape out of the collection. Returns false if absent.
    pub fn remove_shape(&self, id: &str) -> bool {
        let current = self.shapes.get();
        if !current.iter().any(|s| s.id() == id) {
            return false;
        }
        let remaining = current.iter().filter(|s| s.id() != id).cloned().collect();
        self.set_shapes(remaining);
        true
    }

    /// Remove every shape except the base vector indicators.
    pub fn clear_shapes(&self) {
        let kept = self
            .shapes
            .get()
            .iter()
            .filter(|s| s.id() == BASE_I_ID || s.id() == BASE_J_ID)
            .cloned()
            .collect();
        self.set_shapes(kept);
    }
}

/// The two base vector indicators: `(1, 0)` and `(0, 1)` drawn from the
/// origin. Under the board matrix they show the matrix columns.
pub fn base_vectors(i_color: &str, j_color: &str) -> StoreResult<Vec<Shape>> {
    Ok(vec![
        Vector::from_origin(BASE_I_ID, i_color, Vec2::new(1.0, 0.0))?.into(),
        Vector::from_origin(BASE_J_ID, j_color, Vec2::new(0.0, 1.0))?.into(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Geometry, transform_shape};

    fn empty_store() -> BoardStore {
        let config = BoardConfig {
            show_base_vectors: false,
            ..BoardConfig::default()
        };
        BoardStore::new(&config).unwrap()
    }

    #[test]
    fn test_defaults() {
        let store = BoardStore::new(&BoardConfig::default()).unwrap();
        assert_eq!(*store.matrix(), Matrix2::IDENTITY);
        assert_eq!(store.shapes().len(), 2);
        assert!(store.contains(BASE_I_ID));
        assert!((store.x_scale().map(0.0) - 200.0).abs() < 1e-9);
        assert!(empty_store().shapes().is_empty());
    }

    #[test]
    fn test_subscribe_replays_latest() {
        let store = empty_store();
        store.set_matrix(Matrix2::new(2.0, 0.0, 0.0, 2.0)).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = store.matrix_changes(move |m| sink.borrow_mut().push(**m));
        assert_eq!(*seen.borrow(), vec![Matrix2::new(2.0, 0.0, 0.0, 2.0)]);
    }

    #[test]
    fn test_every_set_delivered_in_order() {
        let store = empty_store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = store.matrix_changes(move |m| sink.borrow_mut().push(m.determinant()));
        for k in 1..=3 {
            let k = k as f64;
            store.set_matrix(Matrix2::new(k, 0.0, 0.0, 1.0)).unwrap();
        }
        assert_eq!(*seen.borrow(), vec![1.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_reentrant_set_is_queued_not_dropped() {
        let signal = Rc::new(Signal::new(0_i32));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let inner = Rc::clone(&signal);
        let _bump = signal.subscribe(move |v| {
            if **v == 1 {
                inner.set(2);
                inner.set(3);
            }
        });
        let sink = Rc::clone(&seen);
        let _record = signal.subscribe(move |v| sink.borrow_mut().push(**v));

        signal.set(1);
        assert_eq!(*seen.borrow(), vec![0, 1, 2, 3]);
        assert_eq!(*signal.get(), 3);
    }

    #[test]
    fn test_late_subscriber_sees_values_in_order() {
        let signal = Rc::new(Signal::new(0_i32));
        let late_seen = Rc::new(RefCell::new(Vec::new()));
        let late_sub: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let inner = Rc::clone(&signal);
        let sink = Rc::clone(&late_seen);
        let holder = Rc::clone(&late_sub);
        let _driver = signal.subscribe(move |v| {
            if **v == 1 {
                inner.set(2);
                inner.set(3);
                let sink = Rc::clone(&sink);
                *holder.borrow_mut() = Some(inner.subscribe(move |v| sink.borrow_mut().push(**v)));
            }
        });

        signal.set(1);
        assert_eq!(*late_seen.borrow(), vec![1, 2, 3]);
        assert_eq!(*signal.get(), 3);

        signal.set(4);
        assert_eq!(*late_seen.borrow(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_fan_out_follows_subscription_order() {
        let signal = Signal::new(());
        let order = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&order);
        let second = Rc::clone(&order);
        let _a = signal.subscribe(move |_| first.borrow_mut().push("a"));
        let _b = signal.subscribe(move |_| second.borrow_mut().push("b"));
        order.borrow_mut().clear();
        signal.set(());
        assert_eq!(*order.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let signal = Signal::new(0_u8);
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let sub = signal.subscribe(move |_| counter.set(counter.get() + 1));
        assert_eq!(signal.listener_count(), 1);
        drop(sub);
        assert_eq!(signal.listener_count(), 0);
        signal.set(1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_invalid_matrix_leaves_state_unchanged() {
        let store = empty_store();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let _sub = store.matrix_changes(move |_| counter.set(counter.get() + 1));

        let err = store.set_matrix(Matrix2::new(f64::NAN, 0.0, 0.0, 1.0)).unwrap_err();
        assert!(matches!(err, StoreError::Matrix(MatrixError::NonFinite { .. })));
        assert!(store.set_matrix_rows(&[vec![1.0, 2.0]]).is_err());
        assert_eq!(*store.matrix(), Matrix2::IDENTITY);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let store = empty_store();
        let first = store.add_vector("red", 0.0, 0.0, 1.0, 1.0).unwrap();
        let second = store.add_dot("blue", 1.0, 1.0).unwrap();
        assert_eq!(first, "shape-1");
        assert_eq!(second, "shape-2");

        assert!(store.remove_shape(&second));
        let third = store.add_ellipse("green", 0.0, 0.0, 1.0, 1.0).unwrap();
        assert_eq!(third, "shape-3");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let store = empty_store();
        store
            .add_shape(Dot::new("a", "red", 0.0, 0.0).unwrap().into())
            .unwrap();
        let err = store
            .add_shape(Dot::new("a", "blue", 1.0, 1.0).unwrap().into())
            .unwrap_err();
        assert_eq!(err, StoreError::Shape(ShapeError::DuplicateId("a".to_string())));
        assert_eq!(store.shapes().len(), 1);
    }

    #[test]
    fn test_polygon_helper_validates_points() {
        let store = empty_store();
        let err = store.add_polygon("red", vec![Point::ORIGIN]).unwrap_err();
        assert!(matches!(err, StoreError::Shape(ShapeError::TooFewPoints { .. })));
        assert!(store.shapes().is_empty());
        let id = store
            .add_polygon("red", vec![Point::ORIGIN, Point::new(1.0, 0.0), Point::new(0.0, 1.0)])
            .unwrap();
        // The failed attempt consumed shape-1.
        assert_eq!(id, "shape-2");
    }

    #[test]
    fn test_remove_shape() {
        let store = empty_store();
        let id = store.add_rectangle("red", 0.0, 0.0, 1.0, 1.0).unwrap();
        assert!(store.remove_shape(&id));
        assert!(!store.contains(&id));
        assert!(!store.remove_shape(&id));
    }

    #[test]
    fn test_clear_keeps_base_vectors() {
        let store = BoardStore::new(&BoardConfig::default()).unwrap();
        store.add_dot("red", 1.0, 1.0).unwrap();
        store.clear_shapes();
        let ids: Vec<_> = store.shapes().iter().map(|s| s.id().to_string()).collect();
        assert_eq!(ids, vec![BASE_I_ID, BASE_J_ID]);
    }

    #[test]
    fn test_set_range_and_viewport_republish_scales() {
        let store = empty_store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = store.x_scale_changes(move |s| sink.borrow_mut().push(s.range()));

        store.set_range(5.0).unwrap();
        store.set_viewport(Viewport::new(800.0, 600.0, 20.0)).unwrap();
        assert_eq!(*seen.borrow(), vec![15.0, 5.0, 5.0]);
        assert!((store.x_scale().map(5.0) - 780.0).abs() < 1e-9);
        assert!((store.y_scale().map(5.0) - 20.0).abs() < 1e-9);

        assert!(store.set_range(0.0).is_err());
        assert!((store.x_scale().range() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_range_capped_at_max_range() {
        let store = empty_store();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let _sub = store.x_scale_changes(move |_| counter.set(counter.get() + 1));

        store.set_range(store.max_range()).unwrap();
        assert_eq!(
            store.set_range(2e6),
            Err(StoreError::Scale(ScaleError::RangeTooLarge {
                range: 2e6,
                max_range: 30.0
            }))
        );
        assert!((store.x_scale().range() - 30.0).abs() < f64::EPSILON);
        assert_eq!(calls.get(), 2);

        let config = BoardConfig {
            range: 50.0,
            ..BoardConfig::default()
        };
        assert!(BoardStore::new(&config).is_err());
    }

    #[test]
    fn test_axis_group_id_reserved() {
        let store = empty_store();
        let err = store
            .add_shape(Dot::new(AXIS_GROUP_ID, "red", 0.0, 0.0).unwrap().into())
            .unwrap_err();
        assert_eq!(err, StoreError::Shape(ShapeError::ReservedId(AXIS_GROUP_ID.to_string())));
        assert!(store.shapes().is_empty());
    }

    #[test]
    fn test_base_vectors_show_matrix_columns() {
        let m = Matrix2::new(1.0, 2.0, 3.0, 4.0);
        let (i, j) = m.columns();
        let shapes = base_vectors("green", "red").unwrap();
        for (shape, column) in shapes.iter().zip([i, j]) {
            let Geometry::Segment { start, end } = transform_shape(shape, &m) else {
                panic!("expected a segment");
            };
            assert_eq!(start, Point::ORIGIN);
            assert!((end.x - column.x).abs() < 1e-12);
            assert!((end.y - column.y).abs() < 1e-12);
        }
    }
}
