pub trait Device: Sized + Clone {
    type Buffer: Buffer;
    type VertexArray: VertexArray;
    type TimerQuery: TimerQuery;

    fn create_buffer(&self, descriptor: BufferDescriptor) -> crate::LumeResult<Self::Buffer>;

    /// Bind a vertex buffer and an index buffer together under one vertex array object.
    fn create_vertex_array(&self, descriptor: VertexArrayDescriptor<Self>) -> crate::LumeResult<Self::VertexArray>;

    fn create_timer_query(&self) -> crate::LumeResult<Self::TimerQuery>;

    /// Draw `index_count` 32-bit indices from the vertex array's index buffer.
    fn draw_indexed(&self, vertex_array: &Self::VertexArray, topology: PrimitiveTopology, index_count: u32);

    /// While enabled, primitives are processed but never reach the framebuffer.
    fn set_rasterizer_discard(&self, enabled: bool);
}

pub trait Buffer {
    fn size(&self) -> u64;
    fn write_data(&self, offset: u64, data: &[u8]) -> crate::LumeResult<()>;
}

pub trait VertexArray {}

pub trait TimerQuery {
    fn begin(&mut self);

    /// Stop timing and wait for the result. Returns elapsed GPU time in nanoseconds.
    fn end(&mut self) -> crate::LumeResult<u64>;
}

pub struct BufferDescriptor {
    pub size: u64,
    pub usage: BufferUsage,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BufferUsage(pub u32);

impl BufferUsage {
    pub const VERTEX: Self = Self(1 << 0);
    pub const INDEX: Self = Self(1 << 1);
    pub const COPY_DST: Self = Self(1 << 2);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for BufferUsage {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

pub struct VertexArrayDescriptor<'a, D: Device> {
    pub vertex_buffer: &'a D::Buffer,
    pub index_buffer: &'a D::Buffer,
    pub layout: VertexLayout,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PrimitiveTopology {
    TriangleList,
    LineList,
    PointList,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub format: VertexFormat,
    pub offset: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexFormat {
    Float32x2,
    Float32x3,
}

impl VertexFormat {
    pub fn components(self) -> u32 {
        match self {
            VertexFormat::Float32x2 => 2,
            VertexFormat::Float32x3 => 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexLayout {
    pub array_stride: u32,
    pub attributes: Vec<VertexAttribute>,
}
