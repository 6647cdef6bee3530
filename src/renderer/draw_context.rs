/// Bind groups shared by every scene draw call.
pub struct DrawBindGroups<'a> {
    /// Camera uniform bind group (view-projection, position, aspect).
    pub camera: &'a wgpu::BindGroup,
    /// Lighting uniform bind group.
    pub lighting: &'a wgpu::BindGroup,
}
