//! Identifiers that are legal in GLSL but collide with HLSL.

/// HLSL reserved words and intrinsic names that GLSL ES leaves free, plus
/// the names of the generated IO structs.
const RESERVED: &[&str] = &[
    // Keywords
    "AppendStructuredBuffer", "BlendState", "Buffer", "ByteAddressBuffer", "CompileShader",
    "ComputeShader", "ConsumeStructuredBuffer", "DepthStencilState", "DepthStencilView",
    "DomainShader", "GeometryShader", "HullShader", "InputPatch", "LineStream", "NULL",
    "OutputPatch", "PixelShader", "PointStream", "RWBuffer", "RWByteAddressBuffer",
    "RWStructuredBuffer", "RWTexture1D", "RWTexture1DArray", "RWTexture2D",
    "RWTexture2DArray", "RWTexture3D", "RasterizerState", "RenderTargetView", "SamplerState",
    "SamplerComparisonState", "StructuredBuffer", "Texture1D", "Texture1DArray", "Texture2D",
    "Texture2DArray", "Texture2DMS", "Texture2DMSArray", "Texture3D", "TextureCube",
    "TextureCubeArray", "TriangleStream", "VertexShader", "asm", "asm_fragment", "auto",
    "case", "catch", "cbuffer", "centroid", "char", "class", "column_major", "compile",
    "compile_fragment", "const_cast", "default", "delete", "discard", "double", "dword",
    "dynamic_cast", "enum", "explicit", "export", "extern", "fixed", "friend", "globallycoherent",
    "goto", "groupshared", "half", "inline", "inout", "interface", "line", "lineadj",
    "linear", "long", "matrix", "min10float", "min12int", "min16float", "min16int",
    "min16uint", "mutable", "namespace", "new", "nointerpolation", "noperspective", "operator",
    "packoffset", "pass", "pixelfragment", "point", "precise", "private", "protected",
    "public", "register", "reinterpret_cast", "row_major", "sample", "sampler",
    "sampler1D", "sampler3D", "samplerCUBE", "sampler_state", "shared", "short", "signed",
    "sizeof", "snorm", "stateblock", "stateblock_state", "static_cast", "string", "switch",
    "tbuffer", "technique", "technique10", "technique11", "template", "texture",
    "texture1D", "texture2D", "texture3D", "textureCUBE", "this", "throw", "triangle",
    "triangleadj", "try", "typedef", "typename", "uint", "uniform", "union", "unorm",
    "unsigned", "using", "vector", "vertexfragment", "virtual", "volatile", "static",
    // Vector and matrix type names
    "bool1", "bool2", "bool3", "bool4", "int1", "int2", "int3", "int4", "uint1", "uint2",
    "uint3", "uint4", "half1", "half2", "half3", "half4", "float1", "float2", "float3",
    "float4", "double1", "double2", "double3", "double4", "float1x1", "float1x2",
    "float1x3", "float1x4", "float2x1", "float2x2", "float2x3", "float2x4", "float3x1",
    "float3x2", "float3x3", "float3x4", "float4x1", "float4x2", "float4x3", "float4x4",
    // Intrinsics without a GLSL ES counterpart
    "abort", "acosh", "asinh", "atan2", "atanh", "clip", "cosh", "countbits", "ddx",
    "ddx_coarse", "ddx_fine", "ddy", "ddy_coarse", "ddy_fine", "determinant", "dst",
    "errorf", "firstbithigh", "firstbitlow", "fma", "fmod", "frac", "frexp", "isfinite",
    "isinf", "isnan", "ldexp", "lerp", "lit", "log10", "mad", "modf", "msad4", "mul",
    "noise", "printf", "rcp", "reversebits", "round", "rsqrt", "saturate", "sincos",
    "sinh", "tanh", "tex1D", "tex1Dbias", "tex1Dgrad", "tex1Dlod", "tex1Dproj",
    "tex2D", "tex2Dbias", "tex2Dgrad", "tex2Dlod", "tex2Dproj", "tex3D", "tex3Dbias",
    "tex3Dgrad", "tex3Dlod", "tex3Dproj", "texCUBE", "texCUBEbias", "texCUBEgrad",
    "texCUBElod", "texCUBEproj", "transpose", "trunc",
    // Generated code
    "IN", "OUT", "VS_IN", "VS_OUT", "PS_OUT",
];

/// Whether a GLSL identifier must be renamed in HLSL output.
pub fn is_hlsl_reserved(name: &str) -> bool {
    RESERVED.contains(&name)
}
