/// WGSL shader for the instanced, flat-shaded cubes with hemisphere and
/// directional lighting plus exponential-squared fog.
pub const SCENE_SHADER: &str = r#"
struct SceneUniforms {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    group: mat4x4<f32>,
    hemi_sky: vec4<f32>,
    hemi_ground: vec4<f32>,
    hemi_up: vec4<f32>,
    light_color: vec4<f32>,
    light_dir: vec4<f32>,
    // rgb = fog color, w = density
    fog: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: SceneUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
    @location(2) view_depth: f32,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = uniforms.group * mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let view_pos = uniforms.view * world_pos;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.color = instance.color;
    out.view_depth = -view_pos.z;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);

    let hemi_weight = 0.5 * dot(n, uniforms.hemi_up.xyz) + 0.5;
    let hemi = mix(uniforms.hemi_ground.rgb, uniforms.hemi_sky.rgb, hemi_weight);
    let direct = max(dot(n, uniforms.light_dir.xyz), 0.0) * uniforms.light_color.rgb;
    let lit = in.color.rgb * (hemi + direct);

    let density = uniforms.fog.w;
    let fog_factor = 1.0 - exp(-density * density * in.view_depth * in.view_depth);
    return vec4<f32>(mix(lit, uniforms.fog.rgb, fog_factor), in.color.a);
}
"#;

/// Full-screen triangle shared by every post-processing pass.
pub const FULLSCREEN_VERTEX: &str = r#"
struct FullscreenOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_fullscreen(@builtin(vertex_index) index: u32) -> FullscreenOutput {
    let uv = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    var out: FullscreenOutput;
    out.position = vec4<f32>(uv * vec2<f32>(2.0, -2.0) + vec2<f32>(-1.0, 1.0), 0.0, 1.0);
    out.uv = uv;
    return out;
}
"#;

/// FXAA edge filter. `resolution.xy` is one over the drawing-buffer size.
pub const FXAA_FRAGMENT: &str = r#"
struct FxaaUniforms {
    resolution: vec4<f32>,
};

@group(0) @binding(0) var<uniform> fxaa: FxaaUniforms;
@group(0) @binding(1) var t_source: texture_2d<f32>;
@group(0) @binding(2) var s_linear: sampler;

const REDUCE_MIN: f32 = 1.0 / 128.0;
const REDUCE_MUL: f32 = 1.0 / 8.0;
const SPAN_MAX: f32 = 8.0;
const LUMA: vec3<f32> = vec3<f32>(0.299, 0.587, 0.114);

fn sample_at(uv: vec2<f32>) -> vec4<f32> {
    return textureSampleLevel(t_source, s_linear, uv, 0.0);
}

@fragment
fn fs_fxaa(in: FullscreenOutput) -> @location(0) vec4<f32> {
    let texel = fxaa.resolution.xy;
    let center = sample_at(in.uv);

    let luma_nw = dot(sample_at(in.uv + vec2<f32>(-1.0, -1.0) * texel).rgb, LUMA);
    let luma_ne = dot(sample_at(in.uv + vec2<f32>(1.0, -1.0) * texel).rgb, LUMA);
    let luma_sw = dot(sample_at(in.uv + vec2<f32>(-1.0, 1.0) * texel).rgb, LUMA);
    let luma_se = dot(sample_at(in.uv + vec2<f32>(1.0, 1.0) * texel).rgb, LUMA);
    let luma_m = dot(center.rgb, LUMA);

    let luma_min = min(luma_m, min(min(luma_nw, luma_ne), min(luma_sw, luma_se)));
    let luma_max = max(luma_m, max(max(luma_nw, luma_ne), max(luma_sw, luma_se)));

    var dir = vec2<f32>(
        -((luma_nw + luma_ne) - (luma_sw + luma_se)),
        (luma_nw + luma_sw) - (luma_ne + luma_se),
    );
    let dir_reduce = max((luma_nw + luma_ne + luma_sw + luma_se) * (0.25 * REDUCE_MUL), REDUCE_MIN);
    let rcp_dir_min = 1.0 / (min(abs(dir.x), abs(dir.y)) + dir_reduce);
    dir = clamp(dir * rcp_dir_min, vec2<f32>(-SPAN_MAX), vec2<f32>(SPAN_MAX)) * texel;

    let rgb_a = 0.5 * (
        sample_at(in.uv + dir * (1.0 / 3.0 - 0.5)).rgb +
        sample_at(in.uv + dir * (2.0 / 3.0 - 0.5)).rgb
    );
    let rgb_b = rgb_a * 0.5 + 0.25 * (
        sample_at(in.uv + dir * -0.5).rgb +
        sample_at(in.uv + dir * 0.5).rgb
    );
    let luma_b = dot(rgb_b, LUMA);
    let outside = luma_b < luma_min || luma_b > luma_max;
    return vec4<f32>(select(rgb_b, rgb_a, outside), center.a);
}
"#;

/// Keeps the brighter of the new frame and the decayed previous output.
pub const AFTERIMAGE_FRAGMENT: &str = r#"
struct AfterimageUniforms {
    // x = damp
    params: vec4<f32>,
};

@group(0) @binding(0) var<uniform> afterimage: AfterimageUniforms;
@group(0) @binding(1) var t_new: texture_2d<f32>;
@group(0) @binding(2) var t_old: texture_2d<f32>;
@group(0) @binding(3) var s_linear: sampler;

fn when_gt(x: vec4<f32>, y: f32) -> vec4<f32> {
    return max(sign(x - vec4<f32>(y)), vec4<f32>(0.0));
}

@fragment
fn fs_afterimage(in: FullscreenOutput) -> @location(0) vec4<f32> {
    let texel_new = textureSampleLevel(t_new, s_linear, in.uv, 0.0);
    var texel_old = textureSampleLevel(t_old, s_linear, in.uv, 0.0);
    texel_old = texel_old * afterimage.params.x * when_gt(texel_old, 0.1);
    return max(texel_new, texel_old);
}
"#;

/// Bloom luminosity high-pass with a soft knee.
pub const HIGH_PASS_FRAGMENT: &str = r#"
struct HighPassUniforms {
    // x = threshold, y = smooth width
    params: vec4<f32>,
};

@group(0) @binding(0) var<uniform> high_pass: HighPassUniforms;
@group(0) @binding(1) var t_source: texture_2d<f32>;
@group(0) @binding(2) var s_linear: sampler;

@fragment
fn fs_high_pass(in: FullscreenOutput) -> @location(0) vec4<f32> {
    let texel = textureSampleLevel(t_source, s_linear, in.uv, 0.0);
    let luma = dot(texel.rgb, vec3<f32>(0.299, 0.587, 0.114));
    let threshold = high_pass.params.x;
    let alpha = smoothstep(threshold, threshold + high_pass.params.y, luma);
    return mix(vec4<f32>(0.0), texel, alpha);
}
"#;

/// One direction of a separable Gaussian blur.
pub const BLUR_FRAGMENT: &str = r#"
struct BlurUniforms {
    // xy = 1 / target size, zw = direction
    params: vec4<f32>,
    // x = kernel radius
    kernel: vec4<f32>,
    weights: array<vec4<f32>, 3>,
};

@group(0) @binding(0) var<uniform> blur: BlurUniforms;
@group(0) @binding(1) var t_source: texture_2d<f32>;
@group(0) @binding(2) var s_linear: sampler;

fn weight(i: i32) -> f32 {
    return blur.weights[i / 4][i % 4];
}

@fragment
fn fs_blur(in: FullscreenOutput) -> @location(0) vec4<f32> {
    let texel_step = blur.params.zw * blur.params.xy;
    let radius = i32(blur.kernel.x);

    var weight_sum = weight(0);
    var sum = textureSampleLevel(t_source, s_linear, in.uv, 0.0) * weight_sum;
    for (var i = 1; i < radius; i++) {
        let w = weight(i);
        let offset = texel_step * f32(i);
        sum += (textureSampleLevel(t_source, s_linear, in.uv + offset, 0.0)
            + textureSampleLevel(t_source, s_linear, in.uv - offset, 0.0)) * w;
        weight_sum += 2.0 * w;
    }
    return sum / weight_sum;
}
"#;

/// Weighted sum of the five blurred bloom mips.
pub const COMPOSITE_FRAGMENT: &str = r#"
struct CompositeUniforms {
    // factors for mips 0..3
    factors: vec4<f32>,
    // x = factor for mip 4, y = strength
    tail: vec4<f32>,
};

@group(0) @binding(0) var<uniform> composite: CompositeUniforms;
@group(0) @binding(1) var t_mip0: texture_2d<f32>;
@group(0) @binding(2) var t_mip1: texture_2d<f32>;
@group(0) @binding(3) var t_mip2: texture_2d<f32>;
@group(0) @binding(4) var t_mip3: texture_2d<f32>;
@group(0) @binding(5) var t_mip4: texture_2d<f32>;
@group(0) @binding(6) var s_linear: sampler;

@fragment
fn fs_composite(in: FullscreenOutput) -> @location(0) vec4<f32> {
    let f = composite.factors;
    let sum = f.x * textureSampleLevel(t_mip0, s_linear, in.uv, 0.0)
        + f.y * textureSampleLevel(t_mip1, s_linear, in.uv, 0.0)
        + f.z * textureSampleLevel(t_mip2, s_linear, in.uv, 0.0)
        + f.w * textureSampleLevel(t_mip3, s_linear, in.uv, 0.0)
        + composite.tail.x * textureSampleLevel(t_mip4, s_linear, in.uv, 0.0);
    return composite.tail.y * sum;
}
"#;

/// Adds bloom onto the frame and applies Reinhard tone mapping.
pub const OUTPUT_FRAGMENT: &str = r#"
struct OutputUniforms {
    // x = exposure
    params: vec4<f32>,
};

@group(0) @binding(0) var<uniform> tone: OutputUniforms;
@group(0) @binding(1) var t_base: texture_2d<f32>;
@group(0) @binding(2) var t_bloom: texture_2d<f32>;
@group(0) @binding(3) var s_linear: sampler;

@fragment
fn fs_output(in: FullscreenOutput) -> @location(0) vec4<f32> {
    let color = textureSampleLevel(t_base, s_linear, in.uv, 0.0)
        + textureSampleLevel(t_bloom, s_linear, in.uv, 0.0);
    let rgb = color.rgb * tone.params.x;
    let mapped = clamp(rgb / (vec3<f32>(1.0) + rgb), vec3<f32>(0.0), vec3<f32>(1.0));
    return vec4<f32>(mapped, clamp(color.a, 0.0, 1.0));
}
"#;

/// Prefix a post-processing fragment shader with the full-screen vertex stage.
pub fn fullscreen(fragment: &str) -> String {
    format!("{FULLSCREEN_VERTEX}\n{fragment}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_shader_entry_points() {
        assert!(SCENE_SHADER.contains("fn vs_main"));
        assert!(SCENE_SHADER.contains("fn fs_main"));
    }

    #[test]
    fn post_shaders_share_vertex_stage() {
        for (fragment, entry) in [
            (FXAA_FRAGMENT, "fn fs_fxaa"),
            (AFTERIMAGE_FRAGMENT, "fn fs_afterimage"),
            (HIGH_PASS_FRAGMENT, "fn fs_high_pass"),
            (BLUR_FRAGMENT, "fn fs_blur"),
            (COMPOSITE_FRAGMENT, "fn fs_composite"),
            (OUTPUT_FRAGMENT, "fn fs_output"),
        ] {
            let source = fullscreen(fragment);
            assert!(source.contains("fn vs_fullscreen"));
            assert!(source.contains(entry));
            assert!(!fragment.contains("fn vs_fullscreen"));
        }
    }
}
